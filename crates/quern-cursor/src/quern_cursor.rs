//! Client-side query-execution cursor
//!
//! A cursor accepts parameterized query text plus argument values, escapes
//! the arguments through the connection, interpolates them into the query,
//! and dispatches execution. For bulk INSERT/REPLACE statements,
//! `executemany` rewrites many single-row statements into a bounded number
//! of multi-row statements so large loads cost few round trips.
//!
//! The cursor recognizes exactly one statement shape
//! (`INSERT|REPLACE ... VALUES (...)` with an optional trailing clause);
//! everything else degenerates to one execution per argument set.

mod batch;
mod cursor;
mod params;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod batch_tests;
#[cfg(test)]
mod cursor_tests;
#[cfg(test)]
mod params_tests;

pub use batch::{DEFAULT_MAX_STMT_LENGTH, InsertTemplate, match_insert};
pub use cursor::{Cursor, RowIter};
pub use params::{EscapedParams, Params, interpolate};
