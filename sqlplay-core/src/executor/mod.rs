//! Executor module for playground queries.
//!
//! This module provides an executor that runs queries against any data source
//! implementing the [`DataSource`] trait. [`Dataset`](crate::Dataset) is the
//! provided implementation.

mod local;
mod predicate;

pub use local::QueryExecutor;
pub use predicate::{ComparisonOp, Predicate};

use crate::ast::StatementKind;
use crate::dataset::Table;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Status text returned for simulated `INSERT`/`UPDATE`/`DELETE`.
pub const SIMULATED_ACK: &str =
    "Statement executed successfully (simulated). Data was not persisted.";

/// Header used for `SELECT *` over a table without records.
pub const EMPTY_TABLE_HEADER: &str = "RESULT";

/// Trait for read-only table stores the executor can query.
pub trait DataSource {
    /// Look up a table by name. Implementations must match names
    /// case-insensitively.
    fn table(&self, name: &str) -> Option<&Table>;

    /// List all table names, used in error messages.
    fn table_names(&self) -> Vec<String> {
        vec![]
    }
}

/// Execution behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorOptions {
    /// Report unknown columns and operator-less predicates as errors instead
    /// of excluding rows, projecting `NULL`, or ignoring the predicate.
    #[serde(default)]
    pub strict: bool,
}

impl ExecutorOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Tabular outcome of one statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub statement: StatementKind,
    pub headers: Vec<String>,
    /// Each row is aligned with `headers`.
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// The fixed acknowledgement for a simulated data-modifying statement.
    pub fn acknowledgement(statement: StatementKind) -> Self {
        Self {
            statement,
            headers: vec!["STATUS".to_string()],
            rows: vec![vec![Value::from(SIMULATED_ACK)]],
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one result column, by header (case-insensitive).
    pub fn column(&self, header: &str) -> Option<Vec<&Value>> {
        let idx = self
            .headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(header))?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}
