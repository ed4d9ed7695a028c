//! Query log ingestion
//!
//! A query log is plain text with one SQL statement per line. Blank lines
//! are skipped; every other line becomes one [`RawQuery`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::orchestrator::RawQuery;

/// Extensions accepted when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["txt", "csv"];

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file {path}: only {accepted} files are accepted")]
    UnsupportedFile { path: PathBuf, accepted: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IngestError {
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::UnsupportedFile { .. } => "DBO_INGEST_UNSUPPORTED_FILE",
            IngestError::Read { .. } => "DBO_INGEST_READ_FAILED",
        }
    }
}

/// Splits log content into query records.
///
/// Ids are hyphen-free UUIDs so a `<id>-<position>` key always splits back
/// to the record id at the first `-`.
pub fn parse_log(content: &str, file_name: &str) -> Vec<RawQuery> {
    let timestamp = Utc::now().to_rfc3339();

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            RawQuery::new(line)
                .with_id(Uuid::new_v4().simple().to_string())
                .with_timestamp(timestamp.clone())
                .with_source_file(file_name)
        })
        .collect()
}

/// Returns true if `path` has one of the `accepted` extensions, ignoring case.
pub fn is_accepted<S: AsRef<str>>(path: &Path, accepted: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            accepted
                .iter()
                .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Reads and parses a query log file.
pub fn load_file<S: AsRef<str>>(path: &Path, accepted: &[S]) -> IngestResult<Vec<RawQuery>> {
    if !is_accepted(path, accepted) {
        let accepted = accepted
            .iter()
            .map(|ext| format!(".{}", ext.as_ref()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(IngestError::UnsupportedFile {
            path: path.to_path_buf(),
            accepted,
        });
    }

    let content = fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(parse_log(&content, &file_name))
}
