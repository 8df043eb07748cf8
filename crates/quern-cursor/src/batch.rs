//! Bulk-insert statement recognition
//!
//! `executemany` only batches simple bulk inserts. The matcher here
//! decides, purely textually, whether a query has the one recognized
//! shape: `INSERT`/`REPLACE` up to and including `VALUES`, a single
//! parenthesized group of placeholder tokens, and an optional trailing
//! `ON DUPLICATE ...` clause. Anything else is a routing decision to the
//! per-row execution path, never an error.

use std::sync::LazyLock;

use regex::Regex;

/// Max statement size `executemany` generates, in encoded bytes.
pub const DEFAULT_MAX_STMT_LENGTH: usize = 1_024_000;

// Whole-string anchored, case-insensitive, dot matches newline. Each
// comma-separated item inside the parentheses must be a placeholder
// token; a group of literal values does not match. Trailing semicolon
// and whitespace are tolerated.
static INSERT_VALUES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?si)\A\s*((?:INSERT|REPLACE)\b.+\bVALUES?\s*)(\(\s*(?:%s|%\(.+\)s)\s*(?:,\s*(?:%s|%\(.+\)s)\s*)*\))(\s*(?:ON DUPLICATE.*)?);?\s*\z",
    )
    .expect("valid regex")
});

/// The three parts of a matched bulk-insert query.
///
/// `values` is the per-row template, outer parentheses included; it is
/// captured verbatim and reused for every argument set. When the query
/// carried several comma-separated groups the capture spans them all and
/// the whole span becomes the row template, preserving the historical
/// placeholder shape for one logical row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertTemplate {
    /// Text up to and including `VALUES`
    pub prefix: String,
    /// The parenthesized placeholder group
    pub values: String,
    /// Optional trailing clause, empty when absent
    pub suffix: String,
}

/// Classify a query for `executemany`.
///
/// Returns the split template when the query is bulk-insertable, `None`
/// when the caller must fall back to one execution per argument set.
pub fn match_insert(query: &str) -> Option<InsertTemplate> {
    let caps = INSERT_VALUES_REGEX.captures(query)?;
    let prefix = caps.get(1)?.as_str().to_string();
    let values = caps.get(2)?.as_str().trim_end().to_string();
    let suffix = caps
        .get(3)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    Some(InsertTemplate {
        prefix,
        values,
        suffix,
    })
}
