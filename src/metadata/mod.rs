//! Schema metadata: snapshot types, introspection, and storage orchestration.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MetadataService                            │
//! │   load_cached / fetch_and_save / refresh_identifiers            │
//! │        │                                    │                   │
//! │        ▼                                    ▼                   │
//! │  SchemaIntrospector<C>               SnapshotStore (cache)      │
//! └────────┬────────────────────────────────────────────────────────┘
//!          ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   CatalogConnector / CatalogSession   (WorkerCatalog or a fake) │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use schemadoc::metadata::{SchemaIntrospector, WorkerCatalog};
//!
//! let introspector = SchemaIntrospector::new(WorkerCatalog::new(settings.clone()));
//! let snapshot = introspector.fetch("prod", &params, &credentials).await?;
//! for table in &snapshot.tables {
//!     println!("{} ({} columns)", table.qualified_name(), table.columns.len());
//! }
//! ```

mod catalog;
mod error;
mod introspector;
mod service;
mod types;
mod worker_catalog;

pub use catalog::{
    CatalogColumn, CatalogConnector, CatalogError, CatalogResult, CatalogSession, CatalogTable,
    ColumnDescription, TableDescription,
};
pub use error::{FetchError, FetchResult};
pub use introspector::{build_column, SchemaIntrospector, DEFAULT_SCHEMA};
pub use service::MetadataService;
pub use types::{ColumnMeta, MetadataSnapshot, TableMeta};
pub use worker_catalog::{
    WorkerCatalog, WorkerSession, COLUMN_DESCRIPTIONS_SQL, DRIVER, TABLE_DESCRIPTIONS_SQL,
};
