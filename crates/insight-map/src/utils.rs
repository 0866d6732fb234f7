//! Utility functions for mapping operations.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of characters that are not part of a normalized column name.
static NON_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]+").expect("Invalid separator regex"));

/// Normalizes a column name for role matching.
///
/// Lowercases, replaces every run of characters outside `[a-z0-9_]` with a
/// single space and trims the ends. `"Order-Date (UTC)"` becomes
/// `"order date utc"`; accented letters become separators.
pub fn normalize_column_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    NON_NAME_CHARS.replace_all(&lowered, " ").trim().to_string()
}
