//! Record-definition generation.
//!
//! Renders Kotlin `data class` declarations from pasted result sets or from
//! snapshot tables, one annotated property per field, and plain Rust
//! structs from snapshot tables.

use inflector::Inflector;
use thiserror::Error;

use crate::metadata::TableMeta;
use crate::naming::{to_camel_case, to_record_name};
use crate::parser::{self, LogicalNameLookup, ParseError};

/// Class name used when none is given.
pub const DEFAULT_CLASS_NAME: &str = "ResultRow";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The header line produced no fields.
    #[error("could not interpret a header row")]
    NoFields,
}

pub type CodegenResult<T> = Result<T, CodegenError>;

/// One generated property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: String,
    pub type_name: String,
    pub comment: String,
}

impl RecordField {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            comment: comment.into(),
        }
    }
}

/// Render a Kotlin data class. A blank class name becomes `ResultRow`.
pub fn generate_record(class_name: &str, fields: &[RecordField]) -> String {
    let class_name = match class_name.trim() {
        "" => DEFAULT_CLASS_NAME,
        name => name,
    };

    let properties = fields
        .iter()
        .map(|f| format!("    /** {}*/\n    var {}: {}", f.comment, f.name, f.type_name))
        .collect::<Vec<_>>()
        .join(",\n\n");

    format!("data class {}(\n{}\n)\n", class_name, properties)
}

/// Parse pasted text, infer a type per field, and render a data class.
pub fn generate_from_text(
    raw: &str,
    class_name: &str,
    lookup: &dyn LogicalNameLookup,
) -> CodegenResult<String> {
    let parsed = parser::parse_input(raw, lookup)?;
    if parsed.fields.is_empty() {
        return Err(CodegenError::NoFields);
    }

    let fields: Vec<RecordField> = parsed
        .fields
        .iter()
        .zip(parsed.infer_types())
        .map(|(field, ty)| {
            RecordField::new(&field.identifier, ty.type_name(), &field.comment)
        })
        .collect();

    Ok(generate_record(class_name, &fields))
}

/// Render a data class for a snapshot table using its Kotlin column types.
pub fn generate_for_table(table: &TableMeta) -> String {
    let fields: Vec<RecordField> = table
        .columns
        .iter()
        .map(|c| {
            let name = if c.camel_case_name.trim().is_empty() {
                to_camel_case(&c.column_name)
            } else {
                c.camel_case_name.clone()
            };
            RecordField::new(name, &c.types.kotlin, &c.logical_name)
        })
        .collect();

    generate_record(&to_record_name(&table.table_name, DEFAULT_CLASS_NAME), &fields)
}

/// Render a Rust struct for a snapshot table. Every field is an `Option`
/// since catalog nullability is not captured.
pub fn generate_rust_struct(table: &TableMeta) -> String {
    let mut out = format!("/// {}\n", table_doc(table));
    out.push_str(&format!(
        "pub struct {} {{\n",
        to_record_name(&table.table_name, DEFAULT_CLASS_NAME)
    ));
    for column in &table.columns {
        out.push_str(&format!("    /// {}\n", column.logical_name));
        out.push_str(&format!(
            "    pub {}: Option<{}>,\n",
            column.column_name.to_snake_case(),
            column.types.rust
        ));
    }
    out.push_str("}\n");
    out
}

fn table_doc(table: &TableMeta) -> String {
    match table.table_description.as_deref() {
        Some(desc) if !desc.trim().is_empty() => desc.to_string(),
        _ => table.qualified_name(),
    }
}
