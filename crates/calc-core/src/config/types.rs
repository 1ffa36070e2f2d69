//! Configuration type definitions
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CalcError;
use crate::eval::Grammar;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalcConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub csv: CsvConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Opt into `^`, `%` and the math function allow-list
    #[serde(default)]
    pub extended: bool,
}

impl EvaluatorConfig {
    pub fn grammar(&self) -> Grammar {
        if self.extended {
            Grammar::Extended
        } else {
            Grammar::Strict
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_file_name() -> String { "output.csv".to_string() }
fn default_log_level() -> String { "warn".to_string() }

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_file_name: default_file_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl CalcConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CalcError> {
        let name = &self.csv.default_file_name;
        if name.is_empty() {
            return Err(CalcError::Config("csv.default_file_name cannot be empty".to_string()));
        }
        if name.contains(['/', '\\']) || !name.ends_with(".csv") {
            return Err(CalcError::Config(format!(
                "csv.default_file_name must be a bare .csv file name, got '{}'",
                name
            )));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(CalcError::Config(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        Ok(())
    }
}
