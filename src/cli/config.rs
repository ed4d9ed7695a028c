//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./dboptima-data",
//!   "principal": "guest",
//!   "seed": 42,
//!   "accepted_extensions": ["txt", "csv"],
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingest::DEFAULT_EXTENSIONS;
use crate::observability::Severity;

use super::errors::{CliError, CliResult};

const QUERIES_FILE: &str = "queries.jsonl";
const APPLIED_FILE: &str = "applied_indexes.jsonl";
const ANALYSIS_FILE: &str = "last_analysis.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding stored queries, applied indexes and the last analysis
    pub data_dir: String,

    /// Owner of stored records
    #[serde(default = "default_principal")]
    pub principal: String,

    /// Fixed seed for reproducible estimates; unseeded when absent
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_extensions")]
    pub accepted_extensions: Vec<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_principal() -> String {
    "guest".to_string()
}
fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.principal.trim().is_empty() {
            return Err(CliError::config_error("principal must not be empty"));
        }

        if self.accepted_extensions.is_empty() {
            return Err(CliError::config_error(
                "accepted_extensions must list at least one extension",
            ));
        }

        if let Some(ext) = self
            .accepted_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(CliError::config_error(format!(
                "Invalid extension '{}': give the bare extension, e.g. 'txt'",
                ext
            )));
        }

        self.severity()?;

        Ok(())
    }

    /// Minimum log severity
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn or error.",
                self.log_level
            ))
        })
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn queries_path(&self) -> PathBuf {
        self.data_path().join(QUERIES_FILE)
    }

    pub fn applied_path(&self) -> PathBuf {
        self.data_path().join(APPLIED_FILE)
    }

    pub fn analysis_path(&self) -> PathBuf {
        self.data_path().join(ANALYSIS_FILE)
    }
}
