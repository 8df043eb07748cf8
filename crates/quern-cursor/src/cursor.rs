//! The query-execution cursor
//!
//! Owns one executable handle on a connection, tracks execution state and
//! the last affected-row count, and implements the batched `executemany`
//! rewrite for bulk inserts.

use std::sync::Arc;

use quern_core::{ColumnDesc, Connection, QuernError, RawCursor, Result, Row, Value};

use crate::batch::{self, DEFAULT_MAX_STMT_LENGTH, InsertTemplate};
use crate::params::{EscapedParams, Params, interpolate};

/// A client-side cursor on a database connection.
///
/// Not safe for concurrent use: the cursor holds no internal
/// synchronization and every execute call blocks until the connection
/// answers. Callers sharing one cursor must serialize access externally.
pub struct Cursor {
    conn: Arc<dyn Connection>,
    raw: Box<dyn RawCursor>,
    description: Option<Vec<ColumnDesc>>,
    rowcount: i64,
    /// Default row count for `fetchmany` when no size is given
    pub arraysize: usize,
    max_stmt_length: usize,
    executed: bool,
    closed: bool,
}

impl Cursor {
    /// Open a cursor on the given connection
    pub fn new(conn: Arc<dyn Connection>) -> Result<Self> {
        let raw = conn.cursor()?;
        Ok(Self {
            conn,
            raw,
            description: None,
            rowcount: -1,
            arraysize: 1,
            max_stmt_length: DEFAULT_MAX_STMT_LENGTH,
            executed: false,
            closed: false,
        })
    }

    /// Set the byte budget one batched statement may occupy
    pub fn with_max_stmt_length(mut self, max_stmt_length: usize) -> Self {
        self.max_stmt_length = max_stmt_length;
        self
    }

    /// Affected-row count of the last statement, `-1` when the result was
    /// not row-counted
    pub fn rowcount(&self) -> i64 {
        self.rowcount
    }

    /// Column description of the current result, if there is one
    pub fn description(&self) -> Option<&[ColumnDesc]> {
        self.description.as_deref()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(QuernError::Programming("cursor closed".into()));
        }
        Ok(())
    }

    fn ensure_executed(&self) -> Result<()> {
        self.ensure_open()?;
        if !self.executed {
            return Err(QuernError::Programming("execute() first".into()));
        }
        Ok(())
    }

    /// Render the exact byte string `execute` would send, without
    /// executing anything.
    ///
    /// Follows the same escaping path as `execute`; with no arguments the
    /// query passes through unchanged.
    pub fn mogrify(&self, query: &str, args: Option<&Params>) -> Result<Vec<u8>> {
        self.ensure_open()?;
        match args {
            Some(args) => {
                let escaped = args.escape(self.conn.as_ref())?;
                interpolate(query, &escaped)
            }
            None => Ok(query.as_bytes().to_vec()),
        }
    }

    /// Execute a query.
    ///
    /// Escapes `args` into the query's `%s` / `%(name)s` placeholders and
    /// sends the rendered statement. Returns the affected-row count.
    pub fn execute(&mut self, query: &str, args: Option<&Params>) -> Result<i64> {
        let statement = self.mogrify(query, args)?;
        self.execute_statement(&statement)
    }

    /// Run one query against several argument sets.
    ///
    /// Improves performance on multiple-row INSERT and REPLACE by packing
    /// rows into multi-value statements bounded by the byte budget.
    /// Otherwise it is equivalent to looping over `args` with `execute`.
    /// Returns the total affected-row count.
    #[tracing::instrument(skip(self, query, args), fields(rows = args.len()))]
    pub fn executemany(&mut self, query: &str, args: &[Params]) -> Result<i64> {
        self.ensure_open()?;
        if args.is_empty() {
            return Ok(0);
        }

        if let Some(template) = batch::match_insert(query) {
            return self.do_execute_many(&template, args);
        }

        let mut total = 0i64;
        for arg in args {
            total += self.execute(query, Some(arg))?;
        }
        self.rowcount = total;
        Ok(total)
    }

    /// Pack argument sets into multi-value statements and execute them.
    ///
    /// The buffer starts as the prefix and grows one escaped value group
    /// at a time. When the next group plus separator and suffix would no
    /// longer fit the budget, the accumulated statement is flushed first;
    /// the final flush is unconditional, so every statement carries at
    /// least one group. A single group that alone exceeds the budget is
    /// still executed as one oversized statement.
    fn do_execute_many(&mut self, template: &InsertTemplate, args: &[Params]) -> Result<i64> {
        assert!(
            template.values.starts_with('(') && template.values.ends_with(')'),
            "bulk value template must be parenthesized"
        );
        // Zero-argument pass collapses %% in the prefix and rejects stray
        // placeholders before VALUES.
        let prefix = interpolate(&template.prefix, &EscapedParams::Positional(Vec::new()))?;
        let suffix = template.suffix.as_bytes();
        let conn = Arc::clone(&self.conn);

        tracing::debug!(
            budget = self.max_stmt_length,
            encoding = conn.encoding(),
            rows = args.len(),
            "assembling bulk statement batch"
        );

        let mut buffer = prefix.clone();
        let mut rows = 0i64;
        let mut first = true;
        for arg in args {
            let escaped = arg.escape(conn.as_ref())?;
            let group = interpolate(&template.values, &escaped)?;
            if first {
                first = false;
            } else if buffer.len() + 1 + group.len() + suffix.len() + 1 > self.max_stmt_length {
                let statement = [buffer.as_slice(), suffix].concat();
                rows += self.execute_statement(&statement)?;
                buffer.clear();
                buffer.extend_from_slice(&prefix);
            } else {
                buffer.push(b',');
            }
            buffer.extend_from_slice(&group);
        }
        let statement = [buffer.as_slice(), suffix].concat();
        rows += self.execute_statement(&statement)?;

        self.rowcount = rows;
        Ok(rows)
    }

    /// Send one fully-rendered statement and refresh cursor metadata.
    fn execute_statement(&mut self, statement: &[u8]) -> Result<i64> {
        self.ensure_open()?;
        self.raw.execute(statement)?;

        if self.raw.column_names().is_empty() {
            self.description = None;
            self.rowcount = -1;
        } else {
            self.description = Some(
                self.raw
                    .column_names()
                    .iter()
                    .zip(self.raw.column_types())
                    .map(|(name, type_name)| ColumnDesc {
                        name: name.clone(),
                        type_name: type_name.clone(),
                    })
                    .collect(),
            );
            self.rowcount = self.raw.result_len().map(|n| n as i64).unwrap_or(-1);
        }
        self.executed = true;
        tracing::debug!(
            stmt_len = statement.len(),
            rowcount = self.rowcount,
            "statement executed"
        );
        Ok(self.rowcount)
    }

    /// Fetch the next row
    pub fn fetchone(&mut self) -> Result<Option<Row>> {
        self.ensure_executed()?;
        self.raw.fetchone()
    }

    /// Fetch several rows; defaults to `arraysize` rows
    pub fn fetchmany(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        self.ensure_executed()?;
        let size = size.unwrap_or(self.arraysize);
        self.raw.fetchmany(size)
    }

    /// Fetch all remaining rows
    pub fn fetchall(&mut self) -> Result<Vec<Row>> {
        self.ensure_executed()?;
        self.raw.fetchall()
    }

    /// Iterate over the remaining rows of the current result
    pub fn iter(&mut self) -> RowIter<'_> {
        RowIter { cursor: self }
    }

    /// Execute stored procedure `procname` with `args`.
    ///
    /// Returns the original args. OUT and INOUT parameters cannot be
    /// retrieved at this layer; issue a follow-up query for server
    /// variables if the procedure sets any.
    pub fn callproc<'a>(&mut self, procname: &str, args: &'a [Value]) -> Result<&'a [Value]> {
        self.ensure_open()?;
        tracing::debug!(procname, "callproc is a pass-through at this layer");
        Ok(args)
    }

    /// Advance to the next result set. Multiple result sets are not
    /// supported; always returns `None`.
    pub fn nextset(&mut self) -> Option<()> {
        None
    }

    /// Does nothing, kept for interface compatibility
    pub fn setinputsizes(&self, _sizes: &[usize]) {}

    /// Does nothing, kept for interface compatibility
    pub fn setoutputsizes(&self, _sizes: &[usize]) {}

    /// Close the cursor. Idempotent; afterwards only `close` itself
    /// remains valid.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.raw.close()?;
        self.closed = true;
        Ok(())
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.raw.close();
        }
    }
}

/// Iterator over the rows of a cursor's current result
pub struct RowIter<'a> {
    cursor: &'a mut Cursor,
}

impl Iterator for RowIter<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor.fetchone() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
