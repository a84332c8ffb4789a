//! Pasted result-set / `SELECT` text parser.
//!
//! Turns a pasted block of text into [`FieldToken`]s, one per output column.
//! The mode is chosen from the first non-blank line:
//!
//! - starts with the `SELECT` keyword: the select-list is split on top-level
//!   commas ([`select`]);
//! - otherwise the first line is a delimited header (tab, else comma, else
//!   whitespace runs) and the remaining lines are sample rows.
//!
//! Parsing never fails on odd input. The only error is blank input; an
//! unusable header produces an empty field list.

mod field;
pub mod select;

pub use field::{base_name, identifier};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inference::{self, InferredType};

/// Errors that can occur while parsing pasted text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input was empty or whitespace only.
    #[error("no input to parse: paste a result set with a header row or a SELECT statement")]
    EmptyInput,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Source of display comments, keyed by lower-cased bare column name.
pub trait LogicalNameLookup {
    /// Logical name for a lower-cased column or alias name.
    fn logical_name(&self, key: &str) -> Option<&str>;
}

impl LogicalNameLookup for HashMap<String, String> {
    fn logical_name(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Lookup that never resolves; comments fall back to the base name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogicalNames;

impl LogicalNameLookup for NoLogicalNames {
    fn logical_name(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// Delimiter detected from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    Tab,
    Comma,
    /// Runs of whitespace.
    Whitespace,
}

impl Delimiter {
    /// Pick the delimiter for a header line: tab, else comma, else whitespace.
    pub fn detect(header: &str) -> Self {
        if header.contains('\t') {
            Delimiter::Tab
        } else if header.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }

    /// Split a line into raw (untrimmed) cells.
    pub fn split(&self, line: &str) -> Vec<String> {
        match self {
            Delimiter::Tab => line.split('\t').map(str::to_string).collect(),
            Delimiter::Comma => line.split(',').map(str::to_string).collect(),
            Delimiter::Whitespace => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// How the input was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Delimited(Delimiter),
    Sql,
}

/// One output field of pasted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldToken {
    /// The raw header cell or select expression.
    pub raw: String,
    /// Derived field name (alias, or unqualified column name).
    pub name: String,
    /// camelCase identifier for generated code.
    pub identifier: String,
    /// Display comment: the column's logical name, else `name`.
    pub comment: String,
    /// Cell index in the source rows (delimited mode only).
    pub position: usize,
}

impl FieldToken {
    /// Build a token from a raw cell at `index` in the field list.
    pub fn from_raw(
        raw: &str,
        index: usize,
        position: usize,
        lookup: &dyn LogicalNameLookup,
    ) -> Self {
        let base = base_name(raw);
        let identifier = identifier(&base, index);
        let name = if base.trim().is_empty() {
            field::synthetic_name(index)
        } else {
            base
        };
        let comment = lookup
            .logical_name(&name.to_lowercase())
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());

        Self {
            raw: raw.to_string(),
            name,
            identifier,
            comment,
            position,
        }
    }
}

/// Result of parsing pasted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInput {
    pub mode: InputMode,
    pub fields: Vec<FieldToken>,
    /// Sample rows after the header, split with the header's delimiter.
    /// Always empty in SQL mode.
    pub rows: Vec<Vec<String>>,
}

impl ParsedInput {
    /// Sample values for one field, in row order.
    pub fn samples(&self, field: &FieldToken) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(field.position))
            .map(String::as_str)
            .collect()
    }

    /// Inferred type for every field, in field order.
    pub fn infer_types(&self) -> Vec<InferredType> {
        self.fields
            .iter()
            .map(|f| inference::infer(&self.samples(f)))
            .collect()
    }
}

/// Parse pasted text into fields and sample rows.
pub fn parse_input(raw: &str, lookup: &dyn LogicalNameLookup) -> ParseResult<ParsedInput> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
    let header = lines[0];

    if select::starts_with_select(header) {
        let fields = select::split_select(raw)
            .iter()
            .enumerate()
            .map(|(i, expr)| FieldToken::from_raw(expr, i, i, lookup))
            .collect();
        return Ok(ParsedInput {
            mode: InputMode::Sql,
            fields,
            rows: Vec::new(),
        });
    }

    let delimiter = Delimiter::detect(header);
    let fields = delimiter
        .split(header)
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.trim().is_empty())
        .enumerate()
        .map(|(i, (position, cell))| FieldToken::from_raw(cell.trim(), i, position, lookup))
        .collect();
    let rows = lines[1..]
        .iter()
        .map(|line| delimiter.split(line))
        .collect();

    Ok(ParsedInput {
        mode: InputMode::Delimited(delimiter),
        fields,
        rows,
    })
}

/// Parse pasted text into field tokens.
///
/// Returns [`ParseError::EmptyInput`] for blank input and an empty vector
/// when no usable header could be found.
pub fn parse(raw: &str, lookup: &dyn LogicalNameLookup) -> ParseResult<Vec<FieldToken>> {
    parse_input(raw, lookup).map(|parsed| parsed.fields)
}
