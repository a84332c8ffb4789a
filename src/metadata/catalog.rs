//! Catalog access traits.
//!
//! [`CatalogConnector`] opens one [`CatalogSession`] per fetch. The session
//! exposes the driver's generic table/column listing plus the two bulk
//! description queries. The worker-backed implementation lives in
//! [`super::WorkerCatalog`]; tests plug in in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ConnectionParams, Credentials};
use crate::worker::WorkerError;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// A result set did not have the expected shape.
    #[error("unexpected result shape: {0}")]
    UnexpectedShape(String),

    #[error("{0}")]
    Other(String),
}

impl CatalogError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Whether the worker reported the database as unreachable.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Worker(e) if e.is_connection_failure())
    }
}

/// A table or view as listed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTable {
    /// `None` when the driver reports no schema.
    pub schema: Option<String>,
    pub name: String,
    pub remarks: Option<String>,
}

/// A column as listed by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogColumn {
    pub name: String,
    /// `java.sql.Types` code.
    pub type_code: i32,
    pub type_name: Option<String>,
    pub column_size: Option<i64>,
    pub decimal_digits: Option<i64>,
    pub char_octet_length: Option<i64>,
    pub column_default: Option<String>,
    pub remarks: Option<String>,
}

/// One row of the table-level description query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub schema: String,
    pub table: String,
    pub description: Option<String>,
}

/// One row of the column-level description query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub description: Option<String>,
}

/// Opens catalog sessions.
#[async_trait]
pub trait CatalogConnector: Send + Sync {
    type Session: CatalogSession;

    /// Open a connection. Failures here are connection failures.
    async fn open(
        &self,
        params: &ConnectionParams,
        credentials: &Credentials,
    ) -> CatalogResult<Self::Session>;
}

/// One open database connection.
#[async_trait]
pub trait CatalogSession: Send {
    /// Descriptions of every table, in one query.
    async fn table_descriptions(&mut self) -> CatalogResult<Vec<TableDescription>>;

    /// Descriptions of every column, in one query.
    async fn column_descriptions(&mut self) -> CatalogResult<Vec<ColumnDescription>>;

    /// Tables and views.
    async fn list_tables(&mut self) -> CatalogResult<Vec<CatalogTable>>;

    /// Columns of one table.
    async fn list_columns(&mut self, schema: &str, table: &str)
        -> CatalogResult<Vec<CatalogColumn>>;

    /// Run a trivial query (`SELECT 1`).
    async fn ping(&mut self) -> CatalogResult<()>;

    /// Release the connection.
    async fn close(&mut self) -> CatalogResult<()>;
}
