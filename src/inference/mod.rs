//! Sample-based type inference for pasted result columns.
//!
//! Only the first non-blank sample of a column is classified. Later rows are
//! never consulted, so a column whose first value is `1` and second value is
//! `abc` still infers as [`InferredType::Int`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+\.\d+$").unwrap());
static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap());
static DATE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}$").unwrap());

/// Type inferred from a sample value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferredType {
    /// Fits in a 32-bit signed integer.
    Int,
    /// Integer outside the 32-bit range.
    Long,
    Double,
    Boolean,
    Date,
    Time,
    DateTime,
    /// Generic text; also the result when no sample exists.
    Text,
}

impl InferredType {
    /// Type name used in generated record definitions.
    pub fn type_name(&self) -> &'static str {
        match self {
            InferredType::Int => "Int",
            InferredType::Long => "Long",
            InferredType::Double => "Double",
            InferredType::Boolean => "Boolean",
            InferredType::Date => "java.time.LocalDate",
            InferredType::Time => "java.time.LocalTime",
            InferredType::DateTime => "java.time.LocalDateTime",
            InferredType::Text => "String",
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Classify a single non-blank value.
///
/// Precedence is fixed because the patterns overlap: integer, decimal,
/// boolean, date, time, date-time, text.
pub fn classify(value: &str) -> InferredType {
    let value = value.trim();

    if INTEGER.is_match(value) {
        return match value.parse::<i64>() {
            Ok(n) if i32::try_from(n).is_ok() => InferredType::Int,
            // Digits that overflow i64 are still integral
            _ => InferredType::Long,
        };
    }
    if DECIMAL.is_match(value) {
        return InferredType::Double;
    }
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return InferredType::Boolean;
    }
    if DATE.is_match(value) {
        return InferredType::Date;
    }
    if TIME.is_match(value) {
        return InferredType::Time;
    }
    if DATE_TIME.is_match(value) {
        return InferredType::DateTime;
    }
    InferredType::Text
}

/// Infer a column type from its sample values (header excluded).
///
/// Leading blank samples are skipped; if every sample is blank the result is
/// [`InferredType::Text`].
pub fn infer<S: AsRef<str>>(samples: &[S]) -> InferredType {
    samples
        .iter()
        .map(|s| s.as_ref())
        .find(|s| !s.trim().is_empty())
        .map(classify)
        .unwrap_or(InferredType::Text)
}
