//! Error types for sqlplay-core.
//!
//! Query failures are always local to one `execute` call; dataset errors only
//! happen while a dataset is being built.

use serde::Serialize;
use thiserror::Error;

/// Error returned by [`QueryExecutor::execute`](crate::QueryExecutor::execute).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Unsupported command: {0}")]
    UnsupportedCommand(String),

    #[error("Syntax error: {0}")]
    SyntaxError(String),

    #[error("Table '{table}' not found. Available: {}", .available.join(", "))]
    UnknownTable {
        table: String,
        available: Vec<String>,
    },

    #[error("Column '{column}' not found in table {table}")]
    UnknownColumn { column: String, table: String },

    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),
}

/// Discriminant of a [`QueryError`], for callers that branch on the failure
/// class rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryErrorKind {
    UnsupportedCommand,
    SyntaxError,
    UnknownTable,
    UnknownColumn,
    UnsupportedPredicate,
}

impl QueryError {
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            QueryError::UnsupportedCommand(_) => QueryErrorKind::UnsupportedCommand,
            QueryError::SyntaxError(_) => QueryErrorKind::SyntaxError,
            QueryError::UnknownTable { .. } => QueryErrorKind::UnknownTable,
            QueryError::UnknownColumn { .. } => QueryErrorKind::UnknownColumn,
            QueryError::UnsupportedPredicate(_) => QueryErrorKind::UnsupportedPredicate,
        }
    }
}

/// Result type for query execution
pub type ExecResult<T> = Result<T, QueryError>;

impl Serialize for QueryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Error raised while building a [`Dataset`](crate::Dataset).
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Table '{0}' is defined more than once")]
    DuplicateTable(String),

    #[error("Invalid name '{0}': only letters, digits and '_' are allowed, and keywords are reserved")]
    InvalidName(String),

    #[error("Row {row} of table {table} has {found} values, expected {expected}")]
    RowArity {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} of table {table} does not match the declared columns")]
    ColumnMismatch { table: String, row: usize },

    #[error("Unsupported value in table {table}, column {column}: {found}")]
    InvalidValue {
        table: String,
        column: String,
        found: String,
    },

    #[error("Invalid dataset document: {0}")]
    Format(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for dataset construction
pub type DatasetResult<T> = Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QueryError::SyntaxError("expected FROM, found end of input".to_string());
        assert_eq!(
            err.to_string(),
            "Syntax error: expected FROM, found end of input"
        );

        let err = QueryError::UnknownTable {
            table: "foo".to_string(),
            available: vec!["COUNTRIES".to_string(), "PERSONS".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Table 'foo' not found. Available: COUNTRIES, PERSONS"
        );

        let err = QueryError::UnknownColumn {
            column: "SALARY".to_string(),
            table: "PERSONS".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'SALARY' not found in table PERSONS");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            QueryError::UnsupportedCommand("DROP".into()).kind(),
            QueryErrorKind::UnsupportedCommand
        );
        assert_eq!(
            QueryError::UnsupportedPredicate("x".into()).kind(),
            QueryErrorKind::UnsupportedPredicate
        );
    }

    #[test]
    fn test_error_serializes_as_message() {
        let err = QueryError::SyntaxError("bad".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Syntax error: bad\"");
    }

    #[test]
    fn test_dataset_error_messages() {
        let err = DatasetError::RowArity {
            table: "PERSONS".into(),
            row: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "Row 2 of table PERSONS has 3 values, expected 4"
        );
    }
}
