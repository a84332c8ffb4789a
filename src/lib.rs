//! # schemadoc
//!
//! Annotated schema snapshots for SQL Server databases, cross-language type
//! catalogs, and record definitions generated from pasted query output.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Catalog worker (NDJSON over stdio)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [metadata::SchemaIntrospector]
//! ┌─────────────────────────────────────────────────────────┐
//! │   MetadataSnapshot (tables, columns, logical names,      │
//! │   camelCase identifiers, Java/Kotlin/Rust types)         │
//! └─────────────────────────────────────────────────────────┘
//!            │                               │
//!            ▼ [search]                      ▼ [cache]
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │ LogicalNameIndex         │   │ SQLite snapshot store     │
//! │ search → export rows     │   └──────────────────────────┘
//! └──────────────────────────┘
//!            │ logical-name lookup
//!            ▼ [parser + inference]
//! ┌─────────────────────────────────────────────────────────┐
//! │  Pasted result set / SELECT text → typed fields          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [codegen]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Record definitions                       │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod codegen;
pub mod config;
pub mod crypto;
pub mod export;
pub mod inference;
pub mod metadata;
pub mod naming;
pub mod parser;
pub mod search;
pub mod typemap;
pub mod worker;

pub use metadata::{ColumnMeta, MetadataSnapshot, TableMeta};
pub use search::{LogicalNameIndex, MatchMode};
pub use typemap::{map_native_type, TargetTypes};
