//! Flat result rows for search output, rendered as CSV or TSV.

use csv::{Terminator, Writer, WriterBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::search::SearchMatch;

/// Column labels, in output order.
pub const HEADERS: [&str; 15] = [
    "Input",
    "Logical Name",
    "Schema",
    "Table Logical Name",
    "Table",
    "Column",
    "camelCase",
    "DB Type",
    "JDBC Type",
    "Java Type",
    "Kotlin Type",
    "Size (COLUMN_SIZE)",
    "Decimal Digits (DECIMAL_DIGITS)",
    "Octet Length (CHAR_OCTET_LENGTH)",
    "Default (COLUMN_DEF)",
];

/// One search hit, flattened to display strings. Absent values are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub input: String,
    pub logical_name: String,
    pub schema: String,
    pub table_logical_name: String,
    pub table: String,
    pub column: String,
    pub camel_case: String,
    pub db_type: String,
    pub jdbc_type: String,
    pub java_type: String,
    pub kotlin_type: String,
    pub column_size: String,
    pub decimal_digits: String,
    pub char_octet_length: String,
    pub column_default: String,
}

fn display<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl From<&SearchMatch<'_>> for ResultRow {
    fn from(m: &SearchMatch<'_>) -> Self {
        let c = m.column;
        Self {
            input: m.query.to_string(),
            logical_name: c.logical_name.clone(),
            schema: c.schema_name.clone(),
            table_logical_name: m.table.logical_name().to_string(),
            table: c.table_name.clone(),
            column: c.column_name.clone(),
            camel_case: c.camel_case_name.clone(),
            db_type: c.db_type_name.clone(),
            jdbc_type: c.jdbc_type.clone(),
            java_type: c.types.java.clone(),
            kotlin_type: c.types.kotlin.clone(),
            column_size: display(&c.column_size),
            decimal_digits: display(&c.decimal_digits),
            char_octet_length: display(&c.char_octet_length),
            column_default: display(&c.column_default),
        }
    }
}

impl ResultRow {
    /// Cells in [`HEADERS`] order.
    pub fn cells(&self) -> [&str; 15] {
        [
            &self.input,
            &self.logical_name,
            &self.schema,
            &self.table_logical_name,
            &self.table,
            &self.column,
            &self.camel_case,
            &self.db_type,
            &self.jdbc_type,
            &self.java_type,
            &self.kotlin_type,
            &self.column_size,
            &self.decimal_digits,
            &self.char_octet_length,
            &self.column_default,
        ]
    }
}

/// Rows for a list of matches.
pub fn rows(matches: &[SearchMatch<'_>]) -> Vec<ResultRow> {
    matches.iter().map(ResultRow::from).collect()
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),

    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

fn render(mut writer: Writer<Vec<u8>>, rows: &[ResultRow]) -> ExportResult<String> {
    for row in rows {
        writer.write_record(row.cells())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// CSV with a header record. Every record ends in `\n`.
pub fn to_csv(rows: &[ResultRow]) -> ExportResult<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);
    writer.write_record(HEADERS)?;
    render(writer, rows)
}

/// Tab-separated records without a header, each ending in `\n`.
pub fn to_tsv(rows: &[ResultRow]) -> ExportResult<String> {
    let writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);
    render(writer, rows)
}
