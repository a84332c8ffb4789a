//! `SELECT`-list extraction.
//!
//! This is not a SQL parser. It finds the text between the leading `SELECT`
//! keyword and the first top-level `FROM`, then splits it on commas that are
//! not nested inside parentheses.

/// Whether `text` starts with the `SELECT` keyword (case-insensitive, followed
/// by whitespace or end of input).
pub fn starts_with_select(text: &str) -> bool {
    keyword_len_at(text.trim_start(), 0, "select").is_some()
}

/// Length of `keyword` if it occurs at byte offset `at` as a whole word.
fn keyword_len_at(text: &str, at: usize, keyword: &str) -> Option<usize> {
    let end = at + keyword.len();
    let candidate = text.get(at..end)?;
    if !candidate.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let before_ok = text[..at]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    (before_ok && after_ok).then_some(keyword.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset of the first `FROM` at parenthesis depth zero, searching from
/// `start`.
fn find_top_level_from(text: &str, start: usize) -> Option<usize> {
    let mut depth: i32 = 0;
    for (offset, c) in text[start..].char_indices() {
        let at = start + offset;
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            'f' | 'F' if depth == 0 => {
                if keyword_len_at(text, at, "from").is_some() {
                    return Some(at);
                }
            }
            _ => {}
        }
    }
    None
}

/// The raw select-list text of a `SELECT` statement.
///
/// Returns `None` if the text does not start with `SELECT`. Without a
/// top-level `FROM` the whole remainder is the select-list
/// (`SELECT 1 AS one, 2 AS two`).
pub fn select_list(sql: &str) -> Option<&str> {
    let sql = sql.trim_start();
    let keyword = keyword_len_at(sql, 0, "select")?;
    let body_start = keyword;
    // No top-level FROM: the remainder is still split into fields below,
    // never kept as one token.
    let body_end = find_top_level_from(sql, body_start).unwrap_or(sql.len());
    Some(&sql[body_start..body_end])
}

/// Split a select-list on top-level commas.
///
/// Each expression is trimmed and loses a trailing `;`. Empty expressions are
/// dropped.
pub fn split_top_level(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for c in list.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    parts
        .into_iter()
        .map(|p| p.trim().trim_end_matches(';').trim_end().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Select-list expressions of a `SELECT` statement, or empty if the text is
/// not one.
pub fn split_select(sql: &str) -> Vec<String> {
    select_list(sql).map(split_top_level).unwrap_or_default()
}
