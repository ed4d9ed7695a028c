//! CLI-specific error types
//!
//! Every command failure is reported as `{code}: {message}` and ends the
//! process with a non-zero status.

use std::fmt;
use std::io;

use crate::ingest::IngestError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Record store failure
    StoreError,
    /// Query log could not be ingested
    IngestError,
    /// `apply` before any `analyze`
    AnalysisNotFound,
    /// Recommendation already recorded as applied
    AlreadyApplied,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DBO_CLI_CONFIG_ERROR",
            Self::IoError => "DBO_CLI_IO_ERROR",
            Self::StoreError => "DBO_CLI_STORE_ERROR",
            Self::IngestError => "DBO_CLI_INGEST_ERROR",
            Self::AnalysisNotFound => "DBO_CLI_ANALYSIS_NOT_FOUND",
            Self::AlreadyApplied => "DBO_CLI_ALREADY_APPLIED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn analysis_not_found() -> Self {
        Self::new(
            CliErrorCode::AnalysisNotFound,
            "No analysis found. Run 'dboptima analyze' first.",
        )
    }

    pub fn already_applied(query_key: &str, recommendation_id: u32) -> Self {
        Self::new(
            CliErrorCode::AlreadyApplied,
            format!(
                "Recommendation {} of query {} is already applied",
                recommendation_id, query_key
            ),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreError, format!("[{}] {}", e.code(), e))
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::new(CliErrorCode::IngestError, format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
