//! Field-name derivation for a single header cell or select expression.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::naming::to_camel_case;

static SELECT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^select(\s+|$)").unwrap());
static ALIAS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+as\s+([A-Za-z0-9_]+)$").unwrap());
static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Wrapping pairs, tried in order; at most one layer is removed.
const WRAPPERS: &[(char, char)] = &[('`', '`'), ('"', '"'), ('[', ']')];

/// Remove a leftover `SELECT` keyword and a leading comma.
fn strip_select_artifact(token: &str) -> &str {
    let token = token.trim();
    let token = match SELECT_PREFIX.find(token) {
        Some(m) => token[m.end()..].trim(),
        None => token,
    };
    token.strip_prefix(',').unwrap_or(token).trim()
}

/// Remove one layer of quoting if the whole token is wrapped.
fn strip_wrapper(token: &str) -> &str {
    for (open, close) in WRAPPERS {
        if token.len() >= 2 && token.starts_with(*open) && token.ends_with(*close) {
            return &token[open.len_utf8()..token.len() - close.len_utf8()];
        }
    }
    token
}

/// Base name of a token: its `AS` alias, else the part after the last `.`,
/// else the whole cleaned token.
pub fn base_name(raw: &str) -> String {
    let token = strip_wrapper(strip_select_artifact(raw));

    if let Some(caps) = ALIAS.captures(token) {
        return caps[1].to_string();
    }

    match token.rsplit_once('.') {
        Some((_, tail)) if !tail.trim().is_empty() => tail.to_string(),
        _ => token.to_string(),
    }
}

/// camelCase identifier for a base name, or `field<index>` when nothing
/// usable is left.
pub fn identifier(base: &str, index: usize) -> String {
    let sanitized = NON_IDENT.replace_all(base, "_");
    let camel = to_camel_case(&sanitized);
    if camel.trim().is_empty() {
        synthetic_name(index)
    } else {
        camel
    }
}

pub fn synthetic_name(index: usize) -> String {
    format!("field{}", index)
}
