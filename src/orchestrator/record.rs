//! Uploaded query records

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Source file name used when a record does not carry one.
pub const UNKNOWN_FILE: &str = "Unknown File";

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn unknown_file() -> String {
    UNKNOWN_FILE.to_string()
}

/// One SQL statement as uploaded
///
/// Only `query` is required when deserializing; the analysis core reads
/// nothing but the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuery {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "query")]
    pub text: String,
    #[serde(default = "now_rfc3339")]
    pub timestamp: String,
    #[serde(rename = "fileName", default = "unknown_file")]
    pub source_file: String,
}

impl RawQuery {
    /// Record without an id, stamped now
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            timestamp: now_rfc3339(),
            source_file: unknown_file(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_source_file(mut self, file_name: impl Into<String>) -> Self {
        self.source_file = file_name.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// The id, if present and non-blank
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_query_required() {
        let raw: RawQuery = serde_json::from_str(r#"{"query":"SELECT 1"}"#).unwrap();
        assert_eq!(raw.text, "SELECT 1");
        assert!(raw.id.is_none());
        assert_eq!(raw.source_file, UNKNOWN_FILE);
        assert!(!raw.timestamp.is_empty());
    }

    #[test]
    fn test_underscore_id_alias() {
        let raw: RawQuery =
            serde_json::from_str(r#"{"_id":"abc","query":"q","fileName":"log.txt"}"#).unwrap();
        assert_eq!(raw.id(), Some("abc"));
        assert_eq!(raw.source_file, "log.txt");
    }

    #[test]
    fn test_external_names() {
        let raw = RawQuery::new("SELECT 1")
            .with_id("x")
            .with_source_file("a.csv")
            .with_timestamp("2024-01-01T00:00:00Z");
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["id"], "x");
        assert_eq!(json["query"], "SELECT 1");
        assert_eq!(json["fileName"], "a.csv");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_blank_id_is_absent() {
        assert_eq!(RawQuery::new("q").with_id("  ").id(), None);
    }
}
