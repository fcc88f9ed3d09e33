//! Parsed form of a playground statement.

use serde::Serialize;
use std::fmt;

/// The kind of statement a query was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn is_simulated(&self) -> bool {
        !matches!(self, StatementKind::Select)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        })
    }
}

/// The column list after `SELECT`.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`: every declared column.
    All,
    /// Column tokens exactly as typed; they double as result headers.
    Columns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    /// Column token as typed.
    pub column: String,
    pub descending: bool,
}

/// `SELECT <projection> FROM <table> [WHERE <predicate>] [ORDER BY <column> [ASC|DESC]]`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub projection: Projection,
    /// Table token as typed.
    pub table: String,
    /// Raw text of the `WHERE` clause, interpreted by
    /// [`Predicate::parse`](crate::executor::Predicate::parse).
    pub predicate: Option<String>,
    pub order_by: Option<OrderByItem>,
}
