//! Quern Core - types and collaborator traits for the quern SQL cursor
//!
//! This crate provides the pieces the cursor crate builds on. It defines:
//!
//! - `Connection` - Trait for the underlying database connection
//! - `RawCursor` - Trait for the opaque executable handle a connection hands out
//! - `Value` - A native value bound to a query placeholder
//! - `Literal` - An escaped SQL literal, carried as raw bytes
//! - `QuernError` / `Result` - The shared error type

mod connection;
mod error;
mod types;

pub use connection::*;
pub use error::*;
pub use types::*;
