//! sqlplay-core - a tiny SQL interpreter for teaching `SELECT`.
//!
//! Queries run against an immutable in-memory [`Dataset`]. The supported
//! grammar is deliberately small:
//!
//! ```text
//! SELECT <columns | *> FROM <table> [WHERE <column> <=|>|<|LIKE> <value>] [ORDER BY <column> [ASC|DESC]]
//! ```
//!
//! `INSERT`, `UPDATE` and `DELETE` are recognized but only acknowledged; they
//! never change the data.
//!
//! # Example
//!
//! ```rust
//! use sqlplay_core::{reference_dataset, QueryExecutor, Value};
//!
//! let dataset = reference_dataset().unwrap();
//! let executor = QueryExecutor::new(&dataset);
//!
//! let result = executor
//!     .execute("SELECT COUNTRY FROM COUNTRIES WHERE POP > 300000000")
//!     .unwrap();
//! assert_eq!(result.headers, vec!["COUNTRY"]);
//! assert_eq!(result.rows[0], vec![Value::from("China")]);
//! ```

pub mod ast;
pub mod dataset;
pub mod error;
pub mod executor;
pub mod fixture;
pub mod lexer;
pub mod parser;
pub mod value;

// Re-export main types for convenience
pub use ast::{OrderByItem, Projection, SelectStatement, StatementKind};
pub use dataset::{Dataset, Table};
pub use error::{DatasetError, DatasetResult, ExecResult, QueryError, QueryErrorKind};
pub use executor::{
    ComparisonOp, DataSource, ExecutorOptions, Predicate, QueryExecutor, QueryResult,
    SIMULATED_ACK,
};
pub use fixture::reference_dataset;
pub use lexer::{SqlLexer, Token};
pub use parser::Parser;
pub use value::Value;
