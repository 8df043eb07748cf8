//! Argument escaping and percent-style interpolation
//!
//! One `Params` is one argument set: the values bound to a query's
//! placeholders for one logical execution (or one row of a bulk insert).
//! Escaping goes through the connection's escaper and produces
//! `EscapedParams`, the same shape with every value replaced by its SQL
//! literal. Interpolation then splices the literal bytes into the query
//! template's `%s` / `%(name)s` placeholders.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use quern_core::{Connection, Literal, QuernError, Result, Value};

/// One argument set bound to a query template.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// Ordered values for `%s` placeholders
    Positional(Vec<Value>),
    /// Name-keyed values for `%(name)s` placeholders
    Named(HashMap<String, Value>),
    /// A single value for a lone `%s`
    Scalar(Value),
}

impl Params {
    /// Escape every value in this argument set through the connection.
    ///
    /// Positional sequences escape element-wise, mappings escape
    /// value-wise preserving keys, a scalar escapes on its own. Escaper
    /// failures propagate unchanged.
    pub fn escape(&self, conn: &dyn Connection) -> Result<EscapedParams> {
        match self {
            Params::Positional(values) => values
                .iter()
                .map(|v| conn.escape(v))
                .collect::<Result<Vec<_>>>()
                .map(EscapedParams::Positional),
            Params::Named(map) => map
                .iter()
                .map(|(key, v)| Ok((key.clone(), conn.escape(v)?)))
                .collect::<Result<HashMap<_, _>>>()
                .map(EscapedParams::Named),
            Params::Scalar(value) => conn.escape(value).map(EscapedParams::Scalar),
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<HashMap<String, Value>> for Params {
    fn from(map: HashMap<String, Value>) -> Self {
        Params::Named(map)
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        Params::Scalar(value)
    }
}

/// An argument set with every value already escaped to a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapedParams {
    /// Ordered literals for `%s` placeholders
    Positional(Vec<Literal>),
    /// Name-keyed literals for `%(name)s` placeholders
    Named(HashMap<String, Literal>),
    /// A single literal for a lone `%s`
    Scalar(Literal),
}

// Placeholder tokens, leftmost-first: a literal percent, a positional
// token, a named token.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%|%s|%\(([^)]+)\)s").expect("valid regex"));

/// Interpolate escaped literals into a query template.
///
/// Implements percent-style formatting over bytes: `%s` consumes the next
/// positional literal (the count must match exactly), `%(name)s` looks up
/// a named literal, a scalar binds exactly one `%s`, and `%%` emits a
/// literal percent. Literal bytes are spliced untouched, so the output is
/// a byte string that may not be valid UTF-8.
///
/// Mismatches between template and arguments are usage errors:
/// too few or too many positional values, a missing name, or mixing
/// placeholder styles with the wrong argument shape.
pub fn interpolate(template: &str, args: &EscapedParams) -> Result<Vec<u8>> {
    let bytes = template.as_bytes();
    let mut out = Vec::with_capacity(template.len());
    let mut last_end = 0usize;
    let mut consumed = 0usize;

    for cap in PLACEHOLDER_REGEX.captures_iter(template) {
        let Some(token) = cap.get(0) else { continue };
        out.extend_from_slice(&bytes[last_end..token.start()]);
        last_end = token.end();

        match token.as_str() {
            "%%" => out.push(b'%'),
            "%s" => {
                let literal = match args {
                    EscapedParams::Positional(literals) => {
                        literals.get(consumed).ok_or_else(|| {
                            QuernError::Programming(
                                "not enough arguments for query template".into(),
                            )
                        })?
                    }
                    EscapedParams::Scalar(literal) => {
                        if consumed > 0 {
                            return Err(QuernError::Programming(
                                "not enough arguments for query template".into(),
                            ));
                        }
                        literal
                    }
                    EscapedParams::Named(_) => {
                        return Err(QuernError::Programming(
                            "positional placeholder used with named arguments".into(),
                        ));
                    }
                };
                out.extend_from_slice(literal.as_bytes());
                consumed += 1;
            }
            _ => {
                let Some(name) = cap.get(1) else { continue };
                let literal = match args {
                    EscapedParams::Named(literals) => {
                        literals.get(name.as_str()).ok_or_else(|| {
                            QuernError::Programming(format!(
                                "missing named argument `{}`",
                                name.as_str()
                            ))
                        })?
                    }
                    _ => {
                        return Err(QuernError::Programming(
                            "named placeholder requires named arguments".into(),
                        ));
                    }
                };
                out.extend_from_slice(literal.as_bytes());
            }
        }
    }
    out.extend_from_slice(&bytes[last_end..]);

    let expected = match args {
        EscapedParams::Positional(literals) => Some(literals.len()),
        EscapedParams::Scalar(_) => Some(1),
        EscapedParams::Named(_) => None,
    };
    if let Some(expected) = expected {
        if consumed < expected {
            return Err(QuernError::Programming(
                "not all arguments converted during interpolation".into(),
            ));
        }
    }

    Ok(out)
}
