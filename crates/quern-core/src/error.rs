//! Error types for quern

use thiserror::Error;

/// Core error type for quern operations
#[derive(Error, Debug)]
pub enum QuernError {
    /// Cursor misuse: fetch before execute, operation after close,
    /// placeholder/argument mismatches. Never retried internally.
    #[error("Programming error: {0}")]
    Programming(String),

    /// A value could not be converted to a SQL literal.
    #[error("Escape error: {0}")]
    Escape(String),

    /// Transport or execution failure reported by the connection.
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type alias for quern operations
pub type Result<T> = std::result::Result<T, QuernError>;
