//! Native database type -> target-language type mapping.
//!
//! Mapping runs in explicit lookup tables rather than nested branching:
//!
//! ```text
//! (type code, type name)
//!        │
//!        ▼  BOXED_BY_CODE, then BOXED_BY_NAME, else java.lang.Object
//!   boxed (JVM) type
//!        │
//!        ├──▶ CONCISE_BY_BOXED, else Any      (Kotlin)
//!        └──▶ RUST_BY_BOXED, else serde_json::Value
//! ```
//!
//! Every table is a plain slice, so each representation's fallback rule is
//! visible in one place and new representations are added as new tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic JDBC-style type codes reported by the catalog interface.
///
/// Codes follow `java.sql.Types`; anything not listed resolves to the raw
/// numeric code as its name (see [`type_code_name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JdbcType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Null,
    Other,
    JavaObject,
    Distinct,
    Struct,
    Array,
    Blob,
    Clob,
    Ref,
    DataLink,
    Boolean,
    RowId,
    NChar,
    NVarChar,
    LongNVarChar,
    NClob,
    SqlXml,
    RefCursor,
    TimeWithTimezone,
    TimestampWithTimezone,
}

/// Code/name pairs for every known type code.
static JDBC_TYPES: &[(i32, JdbcType, &str)] = &[
    (-7, JdbcType::Bit, "BIT"),
    (-6, JdbcType::TinyInt, "TINYINT"),
    (5, JdbcType::SmallInt, "SMALLINT"),
    (4, JdbcType::Integer, "INTEGER"),
    (-5, JdbcType::BigInt, "BIGINT"),
    (6, JdbcType::Float, "FLOAT"),
    (7, JdbcType::Real, "REAL"),
    (8, JdbcType::Double, "DOUBLE"),
    (2, JdbcType::Numeric, "NUMERIC"),
    (3, JdbcType::Decimal, "DECIMAL"),
    (1, JdbcType::Char, "CHAR"),
    (12, JdbcType::VarChar, "VARCHAR"),
    (-1, JdbcType::LongVarChar, "LONGVARCHAR"),
    (91, JdbcType::Date, "DATE"),
    (92, JdbcType::Time, "TIME"),
    (93, JdbcType::Timestamp, "TIMESTAMP"),
    (-2, JdbcType::Binary, "BINARY"),
    (-3, JdbcType::VarBinary, "VARBINARY"),
    (-4, JdbcType::LongVarBinary, "LONGVARBINARY"),
    (0, JdbcType::Null, "NULL"),
    (1111, JdbcType::Other, "OTHER"),
    (2000, JdbcType::JavaObject, "JAVA_OBJECT"),
    (2001, JdbcType::Distinct, "DISTINCT"),
    (2002, JdbcType::Struct, "STRUCT"),
    (2003, JdbcType::Array, "ARRAY"),
    (2004, JdbcType::Blob, "BLOB"),
    (2005, JdbcType::Clob, "CLOB"),
    (2006, JdbcType::Ref, "REF"),
    (70, JdbcType::DataLink, "DATALINK"),
    (16, JdbcType::Boolean, "BOOLEAN"),
    (-8, JdbcType::RowId, "ROWID"),
    (-15, JdbcType::NChar, "NCHAR"),
    (-9, JdbcType::NVarChar, "NVARCHAR"),
    (-16, JdbcType::LongNVarChar, "LONGNVARCHAR"),
    (2011, JdbcType::NClob, "NCLOB"),
    (2009, JdbcType::SqlXml, "SQLXML"),
    (2012, JdbcType::RefCursor, "REF_CURSOR"),
    (2013, JdbcType::TimeWithTimezone, "TIME_WITH_TIMEZONE"),
    (2014, JdbcType::TimestampWithTimezone, "TIMESTAMP_WITH_TIMEZONE"),
];

impl JdbcType {
    /// Resolve a numeric type code.
    pub fn from_code(code: i32) -> Option<Self> {
        JDBC_TYPES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, t, _)| *t)
    }

    /// The symbolic name (`"NVARCHAR"`, `"TIMESTAMP"`, ...).
    pub fn name(&self) -> &'static str {
        JDBC_TYPES
            .iter()
            .find(|(_, t, _)| t == self)
            .map(|(_, _, n)| *n)
            .unwrap_or("OTHER")
    }
}

impl fmt::Display for JdbcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Symbolic name for a type code, or the code itself when unrecognized.
pub fn type_code_name(code: i32) -> String {
    JdbcType::from_code(code)
        .map(|t| t.name().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Generic fallbacks for each representation.
pub const BOXED_FALLBACK: &str = "java.lang.Object";
pub const CONCISE_FALLBACK: &str = "Any";
pub const RUST_FALLBACK: &str = "serde_json::Value";

/// Layer 1: type family -> boxed type.
static BOXED_BY_CODE: &[(&[JdbcType], &str)] = &[
    (
        &[
            JdbcType::VarChar,
            JdbcType::NVarChar,
            JdbcType::Char,
            JdbcType::NChar,
            JdbcType::LongNVarChar,
            JdbcType::LongVarChar,
        ],
        "java.lang.String",
    ),
    (
        &[JdbcType::Integer, JdbcType::SmallInt, JdbcType::TinyInt],
        "java.lang.Integer",
    ),
    (&[JdbcType::BigInt], "java.lang.Long"),
    (&[JdbcType::Decimal, JdbcType::Numeric], "java.math.BigDecimal"),
    (&[JdbcType::Double], "java.lang.Double"),
    (&[JdbcType::Float, JdbcType::Real], "java.lang.Float"),
    (&[JdbcType::Date], "java.time.LocalDate"),
    (&[JdbcType::Time], "java.time.LocalTime"),
    (
        &[JdbcType::Timestamp, JdbcType::TimestampWithTimezone],
        "java.time.LocalDateTime",
    ),
    (&[JdbcType::Bit, JdbcType::Boolean], "java.lang.Boolean"),
];

/// Layer 2: upper-cased native type name -> boxed type, consulted only when
/// layer 1 has no entry for the code.
static BOXED_BY_NAME: &[(&str, &str)] = &[
    ("UNIQUEIDENTIFIER", "java.util.UUID"),
    ("VARBINARY", "java.sql.Blob"),
    ("BINARY", "java.sql.Blob"),
];

/// Boxed type -> concise (Kotlin) type.
static CONCISE_BY_BOXED: &[(&str, &str)] = &[
    ("java.lang.String", "String"),
    ("java.lang.Integer", "Int"),
    ("int", "Int"),
    ("java.lang.Short", "Int"),
    ("short", "Int"),
    ("java.lang.Long", "Long"),
    ("long", "Long"),
    ("java.lang.Double", "Double"),
    ("double", "Double"),
    ("java.lang.Float", "Double"),
    ("float", "Double"),
    ("java.math.BigDecimal", "BigDecimal"),
    ("java.time.LocalDateTime", "LocalDateTime"),
    ("java.sql.Timestamp", "LocalDateTime"),
    ("java.time.LocalDate", "LocalDate"),
    ("java.sql.Date", "LocalDate"),
    ("java.time.LocalTime", "LocalTime"),
    ("java.sql.Time", "LocalTime"),
    ("java.lang.Boolean", "Boolean"),
    ("boolean", "Boolean"),
];

/// Boxed type -> Rust type.
static RUST_BY_BOXED: &[(&str, &str)] = &[
    ("java.lang.String", "String"),
    ("java.lang.Integer", "i32"),
    ("java.lang.Long", "i64"),
    ("java.lang.Double", "f64"),
    ("java.lang.Float", "f32"),
    ("java.math.BigDecimal", "rust_decimal::Decimal"),
    ("java.time.LocalDateTime", "chrono::NaiveDateTime"),
    ("java.time.LocalDate", "chrono::NaiveDate"),
    ("java.time.LocalTime", "chrono::NaiveTime"),
    ("java.lang.Boolean", "bool"),
    ("java.util.UUID", "uuid::Uuid"),
    ("java.sql.Blob", "Vec<u8>"),
];

fn lookup<'a>(table: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Boxed (JVM) type for a native column type.
pub fn boxed_type(type_code: i32, type_name: &str) -> &'static str {
    if let Some(jdbc) = JdbcType::from_code(type_code) {
        if let Some((_, boxed)) = BOXED_BY_CODE.iter().find(|(family, _)| family.contains(&jdbc)) {
            return *boxed;
        }
    }
    lookup(BOXED_BY_NAME, &type_name.trim().to_uppercase()).unwrap_or(BOXED_FALLBACK)
}

/// Concise (Kotlin) type for a boxed type.
pub fn concise_type(boxed: &str) -> &'static str {
    lookup(CONCISE_BY_BOXED, boxed).unwrap_or(CONCISE_FALLBACK)
}

/// Rust type for a boxed type.
pub fn rust_type(boxed: &str) -> &'static str {
    lookup(RUST_BY_BOXED, boxed).unwrap_or(RUST_FALLBACK)
}

/// Target-language representations for one native type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetTypes {
    /// Boxed, nullable-capable JVM type (`java.lang.Integer`).
    pub java: String,
    /// Concise Kotlin type (`Int`).
    pub kotlin: String,
    /// Rust type (`i32`).
    pub rust: String,
}

/// Map a native column type to every target representation.
///
/// Total and deterministic: unknown codes and names resolve to each
/// representation's generic fallback.
pub fn map_native_type(type_code: i32, type_name: &str) -> TargetTypes {
    let boxed = boxed_type(type_code, type_name);
    TargetTypes {
        java: boxed.to_string(),
        kotlin: concise_type(boxed).to_string(),
        rust: rust_type(boxed).to_string(),
    }
}
