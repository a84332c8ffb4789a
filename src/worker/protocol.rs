//! Protocol types for worker communication.
//!
//! One JSON object per line in each direction. A fetch opens a catalog
//! session, issues its queries against that session id, and closes it.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the worker.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (e.g., "catalog.list_tables").
    pub method: String,
    /// Method-specific parameters.
    pub params: serde_json::Value,
}

/// Response envelope received from the worker.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

// ============================================================================
// Session
// ============================================================================

/// Parameters for `catalog.open`.
#[derive(Debug, Clone, Serialize)]
pub struct OpenParams {
    /// Database driver name ("mssql").
    pub driver: String,
    /// Driver-specific connection string.
    pub connection_string: String,
}

/// Response from `catalog.open`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenResponse {
    pub session_id: String,
}

/// Parameters for `catalog.close`.
#[derive(Debug, Clone, Serialize)]
pub struct CloseParams {
    pub session_id: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// Parameters for `catalog.list_tables`.
#[derive(Debug, Clone, Serialize)]
pub struct ListTablesParams {
    pub session_id: String,
    /// Object types to include ("TABLE", "VIEW").
    pub table_types: Vec<String>,
}

/// One row of the driver's table listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TableEntry {
    /// Schema; absent when the driver reports none.
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default)]
    pub table_type: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Response from `catalog.list_tables`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListTablesResponse {
    pub tables: Vec<TableEntry>,
}

/// Parameters for `catalog.list_columns`.
#[derive(Debug, Clone, Serialize)]
pub struct ListColumnsParams {
    pub session_id: String,
    pub schema: String,
    pub table: String,
}

/// One row of the driver's column listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnEntry {
    pub name: String,
    /// `java.sql.Types` code.
    pub data_type: i32,
    /// Native type name; some drivers omit it for unusual types.
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub column_size: Option<i64>,
    #[serde(default)]
    pub decimal_digits: Option<i64>,
    #[serde(default)]
    pub char_octet_length: Option<i64>,
    #[serde(default)]
    pub column_default: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Response from `catalog.list_columns`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListColumnsResponse {
    pub columns: Vec<ColumnEntry>,
}

// ============================================================================
// Query Execution
// ============================================================================

/// Parameters for `query.execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteQueryParams {
    pub session_id: String,
    pub sql: String,
}

/// Response from `query.execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteQueryResponse {
    /// Column names.
    pub columns: Vec<String>,
    /// Row data (each row is a list of values).
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Number of rows returned.
    #[serde(default)]
    pub row_count: i64,
}

// ============================================================================
// Method Names
// ============================================================================

/// Method name constants.
pub mod methods {
    pub const OPEN: &str = "catalog.open";
    pub const LIST_TABLES: &str = "catalog.list_tables";
    pub const LIST_COLUMNS: &str = "catalog.list_columns";
    pub const CLOSE: &str = "catalog.close";
    pub const EXECUTE_QUERY: &str = "query.execute";
}
