//! Worker-backed catalog.
//!
//! Each session spawns a worker, opens one database session inside it, and
//! shuts both down on close.

use async_trait::async_trait;
use serde_json::Value;

use super::catalog::{
    CatalogColumn, CatalogConnector, CatalogError, CatalogResult, CatalogSession, CatalogTable,
    ColumnDescription, TableDescription,
};
use crate::config::{ConnectionParams, Credentials, Settings};
use crate::worker::protocol::{ColumnEntry, TableEntry};
use crate::worker::WorkerClient;

/// Driver name understood by the worker.
pub const DRIVER: &str = "mssql";

/// Object types included in a fetch.
const TABLE_TYPES: &[&str] = &["TABLE", "VIEW"];

/// Table-level `MS_Description` values. Columns: schema, table, description.
pub const TABLE_DESCRIPTIONS_SQL: &str = "\
SELECT s.name AS schema_name, t.name AS table_name, CAST(ep.value AS NVARCHAR(4000)) AS description
FROM sys.tables t
INNER JOIN sys.schemas s ON t.schema_id = s.schema_id
LEFT JOIN sys.extended_properties ep
  ON ep.major_id = t.object_id
  AND ep.minor_id = 0
  AND ep.name = 'MS_Description'";

/// Column-level `MS_Description` values. Columns: schema, table, column,
/// description.
pub const COLUMN_DESCRIPTIONS_SQL: &str = "\
SELECT s.name AS schema_name, t.name AS table_name, c.name AS column_name,
       CAST(ep.value AS NVARCHAR(4000)) AS description
FROM sys.columns c
INNER JOIN sys.tables t ON c.object_id = t.object_id
INNER JOIN sys.schemas s ON t.schema_id = s.schema_id
LEFT JOIN sys.extended_properties ep
  ON ep.major_id = c.object_id
  AND ep.minor_id = c.column_id
  AND ep.name = 'MS_Description'";

/// [`CatalogConnector`] that talks to SQL Server through the worker.
#[derive(Debug, Clone)]
pub struct WorkerCatalog {
    settings: Settings,
}

impl WorkerCatalog {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

/// An open worker session.
pub struct WorkerSession {
    client: WorkerClient,
    session_id: String,
}

#[async_trait]
impl CatalogConnector for WorkerCatalog {
    type Session = WorkerSession;

    async fn open(
        &self,
        params: &ConnectionParams,
        credentials: &Credentials,
    ) -> CatalogResult<WorkerSession> {
        let client = WorkerClient::spawn_with_settings(&self.settings).await?;
        let opened = client
            .open(DRIVER, &params.to_connection_string(credentials))
            .await?;
        tracing::debug!(session_id = %opened.session_id, "opened catalog session");

        Ok(WorkerSession {
            client,
            session_id: opened.session_id,
        })
    }
}

#[async_trait]
impl CatalogSession for WorkerSession {
    async fn table_descriptions(&mut self) -> CatalogResult<Vec<TableDescription>> {
        let response = self
            .client
            .execute_query(&self.session_id, TABLE_DESCRIPTIONS_SQL)
            .await?;
        response
            .rows
            .iter()
            .map(|row| {
                Ok(TableDescription {
                    schema: required_cell(row, 0)?,
                    table: required_cell(row, 1)?,
                    description: cell(row, 2)?,
                })
            })
            .collect()
    }

    async fn column_descriptions(&mut self) -> CatalogResult<Vec<ColumnDescription>> {
        let response = self
            .client
            .execute_query(&self.session_id, COLUMN_DESCRIPTIONS_SQL)
            .await?;
        response
            .rows
            .iter()
            .map(|row| {
                Ok(ColumnDescription {
                    schema: required_cell(row, 0)?,
                    table: required_cell(row, 1)?,
                    column: required_cell(row, 2)?,
                    description: cell(row, 3)?,
                })
            })
            .collect()
    }

    async fn list_tables(&mut self) -> CatalogResult<Vec<CatalogTable>> {
        let response = self.client.list_tables(&self.session_id, TABLE_TYPES).await?;
        Ok(response.tables.into_iter().map(Into::into).collect())
    }

    async fn list_columns(
        &mut self,
        schema: &str,
        table: &str,
    ) -> CatalogResult<Vec<CatalogColumn>> {
        let response = self
            .client
            .list_columns(&self.session_id, schema, table)
            .await?;
        Ok(response.columns.into_iter().map(Into::into).collect())
    }

    async fn ping(&mut self) -> CatalogResult<()> {
        self.client.execute_query(&self.session_id, "SELECT 1").await?;
        Ok(())
    }

    async fn close(&mut self) -> CatalogResult<()> {
        self.client.close(&self.session_id).await?;
        Ok(())
    }
}

impl From<TableEntry> for CatalogTable {
    fn from(entry: TableEntry) -> Self {
        Self {
            schema: entry.schema,
            name: entry.name,
            remarks: entry.remarks,
        }
    }
}

impl From<ColumnEntry> for CatalogColumn {
    fn from(entry: ColumnEntry) -> Self {
        Self {
            name: entry.name,
            type_code: entry.data_type,
            type_name: entry.type_name,
            column_size: entry.column_size,
            decimal_digits: entry.decimal_digits,
            char_octet_length: entry.char_octet_length,
            column_default: entry.column_default,
            remarks: entry.remarks,
        }
    }
}

/// Text of a nullable cell.
fn cell(row: &[Value], index: usize) -> CatalogResult<Option<String>> {
    match row.get(index) {
        None => Err(CatalogError::UnexpectedShape(format!(
            "expected at least {} columns, got {}",
            index + 1,
            row.len()
        ))),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Ok(Some(other.to_string())),
    }
}

fn required_cell(row: &[Value], index: usize) -> CatalogResult<String> {
    cell(row, index)?
        .ok_or_else(|| CatalogError::UnexpectedShape(format!("column {} is null", index + 1)))
}
