//! Observable events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` field of a log line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,

    // Query intake
    /// Log file parsed and stored
    QueriesUploaded,
    /// Stored queries removed
    QueriesCleared,

    // Analysis
    /// One statement analyzed
    QueryAnalyzed,
    /// A whole batch analyzed
    BatchAnalyzed,
    /// Explain output rendered
    ExplainComplete,

    // Applied indexes
    /// Recommendation recorded as applied
    RecommendationApplied,
    /// Applied records removed
    AppliedCleared,

    // Dashboard
    /// Dashboard metrics computed
    DashboardComputed,

    // Storage
    /// A stored line failed verification
    StoreCorruption,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueriesUploaded => "QUERIES_UPLOADED",
            Event::QueriesCleared => "QUERIES_CLEARED",
            Event::QueryAnalyzed => "QUERY_ANALYZED",
            Event::BatchAnalyzed => "BATCH_ANALYZED",
            Event::ExplainComplete => "EXPLAIN_COMPLETE",
            Event::RecommendationApplied => "RECOMMENDATION_APPLIED",
            Event::AppliedCleared => "APPLIED_CLEARED",
            Event::DashboardComputed => "DASHBOARD_COMPUTED",
            Event::StoreCorruption => "STORE_CORRUPTION",
        }
    }

    /// Returns true if the event reports damaged data
    pub fn is_error(&self) -> bool {
        matches!(self, Event::StoreCorruption)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
