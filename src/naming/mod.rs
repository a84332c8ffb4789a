//! Identifier case conversion.
//!
//! Database columns are snake_case (`customer_id`, `ORDER_TOTAL`); generated
//! record fields are camelCase (`customerId`, `orderTotal`). Record names for
//! whole tables are singular PascalCase (`order_items` -> `OrderItem`).

use inflector::Inflector;

/// Convert a snake_case name to camelCase.
///
/// The input is lower-cased, split on `_`, and every segment after the first
/// has its first character upper-cased. Empty segments (from `__` or a
/// trailing `_`) contribute nothing, so the output never contains `_`.
/// Blank input is returned unchanged.
///
/// # Examples
/// ```
/// use schemadoc::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("customer_id"), "customerId");
/// assert_eq!(to_camel_case("ORDER_TOTAL"), "orderTotal");
/// assert_eq!(to_camel_case(""), "");
/// ```
pub fn to_camel_case(name: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }

    let lower = name.to_lowercase();
    let mut parts = lower.split('_');

    let mut result = String::with_capacity(lower.len());
    if let Some(first) = parts.next() {
        result.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(c) = chars.next() {
            result.extend(c.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Derive a record (class) name from a table name.
///
/// Uses inflector's class casing, which singularizes and PascalCases:
/// `order_items` -> `OrderItem`. Falls back to `default` for blank input.
pub fn to_record_name(table_name: &str, default: &str) -> String {
    let trimmed = table_name.trim();
    if trimmed.is_empty() {
        return default.to_string();
    }
    let name = trimmed.to_lowercase().to_class_case();
    if name.is_empty() {
        default.to_string()
    } else {
        name
    }
}
