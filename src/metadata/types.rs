//! Snapshot types produced by introspection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::naming::to_camel_case;
use crate::typemap::TargetTypes;

/// One complete capture of a database's tables and columns.
///
/// Never edited in place: a re-fetch or an identifier refresh yields a new
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    pub profile_id: String,
    pub database_name: String,
    pub fetched_at: DateTime<Utc>,
    /// Sorted by (schema, table).
    pub tables: Vec<TableMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub schema_name: String,
    pub table_name: String,
    #[serde(default)]
    pub table_description: Option<String>,
    /// Sorted by column name.
    pub columns: Vec<ColumnMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub camel_case_name: String,
    /// `MS_Description` annotation, else driver remarks.
    #[serde(default)]
    pub column_description: Option<String>,
    /// Description if present, else the column name.
    pub logical_name: String,
    /// Native type name (`nvarchar`, `datetime2`).
    pub db_type_name: String,
    /// Symbolic JDBC type name, or the numeric code when unrecognized.
    pub jdbc_type: String,
    #[serde(flatten)]
    pub types: TargetTypes,
    #[serde(default)]
    pub column_size: Option<i64>,
    #[serde(default)]
    pub decimal_digits: Option<i64>,
    #[serde(default)]
    pub char_octet_length: Option<i64>,
    #[serde(default)]
    pub column_default: Option<String>,
}

impl ColumnMeta {
    /// `schema.table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.schema_name, self.table_name, self.column_name)
    }
}

impl TableMeta {
    /// `schema.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }

    /// Table description, or empty when there is none.
    pub fn logical_name(&self) -> &str {
        self.table_description.as_deref().unwrap_or("")
    }

    /// Sort columns by name.
    pub fn sort_columns(&mut self) {
        self.columns.sort_by(|a, b| a.column_name.cmp(&b.column_name));
    }
}

impl MetadataSnapshot {
    /// Build a snapshot stamped with the current time. Tables and their
    /// columns are sorted regardless of the order given.
    pub fn new(
        profile_id: impl Into<String>,
        database_name: impl Into<String>,
        mut tables: Vec<TableMeta>,
    ) -> Self {
        for table in &mut tables {
            table.sort_columns();
        }
        tables.sort_by(|a, b| {
            (a.schema_name.as_str(), a.table_name.as_str())
                .cmp(&(b.schema_name.as_str(), b.table_name.as_str()))
        });

        Self {
            profile_id: profile_id.into(),
            database_name: database_name.into(),
            fetched_at: Utc::now(),
            tables,
        }
    }

    /// Columns of the table at `table_index`; empty when out of range.
    pub fn columns_for_table(&self, table_index: usize) -> &[ColumnMeta] {
        self.tables
            .get(table_index)
            .map(|t| t.columns.as_slice())
            .unwrap_or(&[])
    }

    /// Find a table by schema and name (case-insensitive).
    pub fn find_table(&self, schema: &str, table: &str) -> Option<&TableMeta> {
        self.tables.iter().find(|t| {
            t.schema_name.eq_ignore_ascii_case(schema) && t.table_name.eq_ignore_ascii_case(table)
        })
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// A copy with blank camelCase identifiers recomputed and a new
    /// timestamp. Non-blank identifiers are kept as stored.
    pub fn refresh_identifiers(&self) -> MetadataSnapshot {
        let mut refreshed = self.clone();
        for column in refreshed.tables.iter_mut().flat_map(|t| t.columns.iter_mut()) {
            if column.camel_case_name.trim().is_empty() {
                column.camel_case_name = to_camel_case(&column.column_name);
            }
        }
        refreshed.fetched_at = Utc::now();
        refreshed
    }

    /// SHA-256 over the table list only, as lowercase hex.
    ///
    /// Two fetches of an unchanged schema hash identically.
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(&self.tables)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}
