//! Connection and raw-cursor traits
//!
//! The cursor crate never talks to a database directly. It consumes two
//! narrow seams: a `Connection` that can escape values and hand out
//! executable handles, and a `RawCursor` that executes fully-rendered
//! statements and exposes whatever result metadata the server reported.
//!
//! The model is single-threaded and blocking: every `execute` call blocks
//! until the server answers, and neither trait carries any internal
//! synchronization. Callers sharing a cursor must serialize access
//! themselves.

use crate::{Literal, Result, Row, Value};

/// A database connection
pub trait Connection {
    /// Open an opaque executable handle on this connection
    fn cursor(&self) -> Result<Box<dyn RawCursor>>;

    /// Convert one native value into a SQL literal.
    ///
    /// Failures propagate unchanged to the caller; the cursor layer adds
    /// no recovery.
    fn escape(&self, value: &Value) -> Result<Literal>;

    /// Name of the text-to-bytes codec this connection speaks.
    ///
    /// Informational in a UTF-8-native client; statement length is always
    /// measured on the encoded bytes themselves.
    fn encoding(&self) -> &'static str {
        "utf8"
    }
}

/// The executable handle a connection hands out.
///
/// Statements arrive fully rendered, placeholders already resolved to
/// literals. After a successful `execute` the handle exposes column
/// metadata and a materialized result when the statement produced one;
/// both are empty otherwise.
pub trait RawCursor {
    /// Execute one complete statement, blocking until the server answers
    fn execute(&mut self, statement: &[u8]) -> Result<()>;

    /// Column names of the current result, empty if there is none
    fn column_names(&self) -> &[String];

    /// Column type names of the current result, empty if there is none
    fn column_types(&self) -> &[String];

    /// Number of rows in the materialized current result, if any
    fn result_len(&self) -> Option<usize>;

    /// Fetch the next row of the current result
    fn fetchone(&mut self) -> Result<Option<Row>>;

    /// Fetch up to `size` rows of the current result
    fn fetchmany(&mut self, size: usize) -> Result<Vec<Row>>;

    /// Fetch all remaining rows of the current result
    fn fetchall(&mut self) -> Result<Vec<Row>>;

    /// Release the handle
    fn close(&mut self) -> Result<()>;
}
