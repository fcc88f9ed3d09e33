//! Configuration handling for the playground
//!
//! Settings come from `sqlplay.toml`, then environment variables, then
//! command-line flags, each layer overriding the previous one.
//!
//! ## Environment Variables
//!
//! - `SQLPLAY_STRICT` - `true`/`false`: report unknown columns and
//!   operator-less predicates as errors
//! - `SQLPLAY_FORMAT` - `table` or `json`
//! - `SQLPLAY_DATASET` - path to a JSON dataset replacing the built-in tables
//! - `SQLPLAY_HISTORY` - REPL history file
//!
//! These can be set in a `.env` file next to the configuration file.

use serde::{Deserialize, Serialize};
use sqlplay_core::{reference_dataset, Dataset, DatasetError, ExecutorOptions};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "sqlplay.toml";

/// Environment variable names
pub const ENV_STRICT: &str = "SQLPLAY_STRICT";
pub const ENV_FORMAT: &str = "SQLPLAY_FORMAT";
pub const ENV_DATASET: &str = "SQLPLAY_DATASET";
pub const ENV_HISTORY: &str = "SQLPLAY_HISTORY";

/// Default REPL history file name, placed in the home directory
pub const HISTORY_FILE_NAME: &str = ".sqlplay_history";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: String, value: String },

    #[error("Cannot load dataset {path}: {source}")]
    Dataset { path: PathBuf, source: DatasetError },

    #[error("Built-in dataset is invalid: {0}")]
    Fixture(DatasetError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Report lenient cases as errors
    pub strict: bool,
    /// Result output format
    pub format: OutputFormat,
    /// JSON dataset to load instead of the built-in tables
    pub dataset: Option<PathBuf>,
    /// REPL history file
    pub history_file: Option<PathBuf>,
}

impl PlaygroundConfig {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Otherwise `sqlplay.toml` in
    /// the current directory is used when present, and defaults when not.
    /// A `.env` file next to the configuration is loaded before environment
    /// overrides are applied.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let (config_path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE_NAME), false),
        };

        let env_path = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }

        let mut config = if required || config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|source| {
                ConfigError::Io {
                    path: config_path.clone(),
                    source,
                }
            })?;
            tracing::debug!(path = %config_path.display(), "Loaded configuration file");
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable lookup; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_STRICT) {
            self.strict = parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnv {
                var: ENV_STRICT.to_string(),
                value: value.clone(),
            })?;
        }

        if let Some(value) = get(ENV_FORMAT) {
            self.format = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_FORMAT.to_string(),
                value: value.clone(),
            })?;
        }

        if let Some(value) = get(ENV_DATASET) {
            self.dataset = Some(PathBuf::from(value));
        }

        if let Some(value) = get(ENV_HISTORY) {
            self.history_file = Some(PathBuf::from(value));
        }

        Ok(())
    }

    pub fn executor_options(&self) -> ExecutorOptions {
        ExecutorOptions {
            strict: self.strict,
        }
    }

    /// The configured JSON dataset, or the built-in tables.
    pub fn load_dataset(&self) -> ConfigResult<Dataset> {
        let Some(path) = &self.dataset else {
            return reference_dataset().map_err(ConfigError::Fixture);
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Dataset::from_json_str(&content).map_err(|source| ConfigError::Dataset {
            path: path.clone(),
            source,
        })
    }

    /// History file path, defaulting to `~/.sqlplay_history`.
    pub fn history_path(&self) -> PathBuf {
        if let Some(path) = &self.history_file {
            return path.clone();
        }
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(HISTORY_FILE_NAME))
            .unwrap_or_else(|_| PathBuf::from(HISTORY_FILE_NAME))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PlaygroundConfig::default();
        assert!(!config.strict);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.dataset.is_none());
    }

    #[test]
    fn test_from_toml() {
        let config = PlaygroundConfig::from_toml_str(
            r#"
            strict = true
            format = "json"
            dataset = "data/shop.json"
            "#,
        )
        .unwrap();
        assert!(config.strict);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.dataset, Some(PathBuf::from("data/shop.json")));
        assert!(config.history_file.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            PlaygroundConfig::from_toml_str("format = \"xml\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = PlaygroundConfig::default();
        config
            .apply_overrides(env(&[
                (ENV_STRICT, "yes"),
                (ENV_FORMAT, "JSON"),
                (ENV_HISTORY, "/tmp/hist"),
                (ENV_DATASET, ""),
            ]))
            .unwrap();
        assert!(config.strict);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.history_path(), PathBuf::from("/tmp/hist"));
        assert!(config.dataset.is_none());
    }

    #[test]
    fn test_invalid_override() {
        let mut config = PlaygroundConfig::default();
        let err = config
            .apply_overrides(env(&[(ENV_STRICT, "maybe")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'maybe' for SQLPLAY_STRICT");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "strict = true\n").unwrap();

        let config = PlaygroundConfig::load(Some(&path)).unwrap();
        assert!(config.strict);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = PlaygroundConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_dataset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop.json");
        std::fs::write(&path, r#"{"ITEMS": [{"SKU": "A1", "QTY": 2}]}"#).unwrap();

        let config = PlaygroundConfig {
            dataset: Some(path),
            ..Default::default()
        };
        let dataset = config.load_dataset().unwrap();
        assert_eq!(dataset.table_names(), vec!["ITEMS"]);

        let builtin = PlaygroundConfig::default().load_dataset().unwrap();
        assert_eq!(builtin.table_names(), vec!["COUNTRIES", "PERSONS"]);
    }

    #[test]
    fn test_load_bad_dataset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"ITEMS": [{"SKU": null}]}"#).unwrap();

        let config = PlaygroundConfig {
            dataset: Some(path),
            ..Default::default()
        };
        assert!(matches!(
            config.load_dataset(),
            Err(ConfigError::Dataset { .. })
        ));
    }
}
