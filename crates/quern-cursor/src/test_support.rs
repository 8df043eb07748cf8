//! Test doubles: an in-memory connection that records every executed
//! statement and escapes values with simple quoting rules.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use quern_core::{Connection, Literal, QuernError, RawCursor, Result, Row, Value};

/// A planned result the mock hands back for one execute call.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockResult {
    pub names: Vec<String>,
    pub types: Vec<String>,
    pub rows: Vec<Row>,
}

/// A planned result whose row count models a server-reported
/// affected-row count.
pub(crate) fn affected(n: usize) -> MockResult {
    MockResult {
        names: vec!["affected".into()],
        types: vec!["UInt64".into()],
        rows: (0..n)
            .map(|i| Row::new(vec!["affected".into()], vec![Value::Int64(i as i64)]))
            .collect(),
    }
}

#[derive(Debug, Default)]
struct Shared {
    executed: Vec<Vec<u8>>,
    planned: VecDeque<MockResult>,
    fail_at: Option<usize>,
    closes: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockConnection {
    shared: Rc<RefCell<Shared>>,
}

impl MockConnection {
    /// Queue a result for the next unmatched execute call. Executes with
    /// no planned result report no metadata at all.
    pub fn push_result(&self, result: MockResult) {
        self.shared.borrow_mut().planned.push_back(result);
    }

    /// Make the execute call with this 0-based index fail.
    pub fn fail_at(&self, index: usize) {
        self.shared.borrow_mut().fail_at = Some(index);
    }

    pub fn executed(&self) -> Vec<Vec<u8>> {
        self.shared.borrow().executed.clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.shared
            .borrow()
            .executed
            .iter()
            .map(|stmt| String::from_utf8_lossy(stmt).into_owned())
            .collect()
    }

    pub fn execute_count(&self) -> usize {
        self.shared.borrow().executed.len()
    }

    pub fn close_count(&self) -> usize {
        self.shared.borrow().closes
    }
}

impl Connection for MockConnection {
    fn cursor(&self) -> Result<Box<dyn RawCursor>> {
        Ok(Box::new(MockRawCursor {
            shared: Rc::clone(&self.shared),
            names: Vec::new(),
            types: Vec::new(),
            rows: Vec::new(),
            pos: 0,
        }))
    }

    fn escape(&self, value: &Value) -> Result<Literal> {
        let literal = match value {
            Value::Null => Literal::from("NULL"),
            Value::Bool(true) => Literal::from("1"),
            Value::Bool(false) => Literal::from("0"),
            Value::Int64(v) => Literal::from(v.to_string()),
            Value::Float64(v) => {
                if !v.is_finite() {
                    return Err(QuernError::Escape(format!("{v} has no SQL literal")));
                }
                Literal::from(v.to_string())
            }
            Value::Decimal(s) => Literal::from(s.clone()),
            Value::String(s) => Literal::new(quote(s.as_bytes())),
            Value::Bytes(b) => Literal::new(quote(b)),
            Value::Uuid(u) => Literal::from(format!("'{u}'")),
            Value::Date(d) => Literal::from(format!("'{d}'")),
            Value::Time(t) => Literal::from(format!("'{t}'")),
            Value::DateTime(dt) => Literal::from(format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S"))),
            Value::Json(j) => Literal::new(quote(j.to_string().as_bytes())),
        };
        Ok(literal)
    }
}

/// Single-quote raw bytes, backslash-escaping quotes and backslashes.
/// Non-UTF-8 bytes pass through untouched.
fn quote(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len() + 2);
    out.push(b'\'');
    for &b in raw {
        if b == b'\'' || b == b'\\' {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b'\'');
    out
}

#[derive(Debug)]
struct MockRawCursor {
    shared: Rc<RefCell<Shared>>,
    names: Vec<String>,
    types: Vec<String>,
    rows: Vec<Row>,
    pos: usize,
}

impl RawCursor for MockRawCursor {
    fn execute(&mut self, statement: &[u8]) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        let index = shared.executed.len();
        if shared.fail_at == Some(index) {
            return Err(QuernError::Connection("injected failure".into()));
        }
        shared.executed.push(statement.to_vec());
        let result = shared.planned.pop_front().unwrap_or_default();
        self.names = result.names;
        self.types = result.types;
        self.rows = result.rows;
        self.pos = 0;
        Ok(())
    }

    fn column_names(&self) -> &[String] {
        &self.names
    }

    fn column_types(&self) -> &[String] {
        &self.types
    }

    fn result_len(&self) -> Option<usize> {
        if self.names.is_empty() {
            None
        } else {
            Some(self.rows.len())
        }
    }

    fn fetchone(&mut self) -> Result<Option<Row>> {
        let row = self.rows.get(self.pos).cloned();
        if row.is_some() {
            self.pos += 1;
        }
        Ok(row)
    }

    fn fetchmany(&mut self, size: usize) -> Result<Vec<Row>> {
        let end = (self.pos + size).min(self.rows.len());
        let out = self.rows[self.pos..end].to_vec();
        self.pos = end;
        Ok(out)
    }

    fn fetchall(&mut self) -> Result<Vec<Row>> {
        let out = self.rows[self.pos..].to_vec();
        self.pos = self.rows.len();
        Ok(out)
    }

    fn close(&mut self) -> Result<()> {
        self.shared.borrow_mut().closes += 1;
        Ok(())
    }
}
