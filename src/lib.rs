//! sqlplay - an interactive SQL playground.
//!
//! The query engine lives in [`sqlplay_core`]; this crate adds configuration,
//! result rendering, the [`Playground`] facade and the REPL.

pub mod config;
pub mod playground;
pub mod render;
pub mod repl;

pub use config::{ConfigError, ConfigResult, OutputFormat, PlaygroundConfig};
pub use playground::Playground;
pub use render::{render, render_error, render_json, render_table, NO_RESULTS};
pub use sqlplay_core::{
    Dataset, ExecutorOptions, QueryError, QueryErrorKind, QueryExecutor, QueryResult,
    StatementKind, Table, Value,
};
