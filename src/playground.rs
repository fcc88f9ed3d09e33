//! The playground facade: execute, render, or both.

use crate::config::{ConfigResult, OutputFormat, PlaygroundConfig};
use crate::render::{render, render_error};
use sqlplay_core::{
    reference_dataset, Dataset, DatasetResult, ExecResult, QueryExecutor, QueryResult,
};

/// A dataset plus the settings used to query and display it.
#[derive(Debug, Clone)]
pub struct Playground {
    dataset: Dataset,
    config: PlaygroundConfig,
}

impl Playground {
    pub fn new(dataset: Dataset, config: PlaygroundConfig) -> Self {
        Self { dataset, config }
    }

    /// Built-in tables with default settings.
    pub fn with_reference_data() -> DatasetResult<Self> {
        Ok(Self::new(reference_dataset()?, PlaygroundConfig::default()))
    }

    /// Load whatever dataset the configuration points at.
    pub fn from_config(config: PlaygroundConfig) -> ConfigResult<Self> {
        let dataset = config.load_dataset()?;
        tracing::info!(
            tables = dataset.tables().len(),
            strict = config.strict,
            "Playground ready"
        );
        Ok(Self::new(dataset, config))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.config.strict = strict;
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.config.format = format;
    }

    pub fn executor(&self) -> QueryExecutor<'_> {
        QueryExecutor::with_options(&self.dataset, self.config.executor_options())
    }

    /// Execute and return the structured result.
    pub fn run_query(&self, sql: &str) -> ExecResult<QueryResult> {
        self.executor().execute(sql)
    }

    /// Render a result with the configured output format.
    pub fn render_result(&self, result: &QueryResult) -> String {
        render(result, self.config.format)
    }

    /// Execute and render; a failure renders as an error line.
    pub fn run(&self, sql: &str) -> String {
        match self.run_query(sql) {
            Ok(result) => self.render_result(&result),
            Err(err) => {
                tracing::debug!(error = %err, "Query failed");
                render_error(&err)
            }
        }
    }
}
