//! Observability for dboptima
//!
//! - Structured logging (JSON lines on stderr)
//! - Analysis counters
//! - Command scopes with elapsed time
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never fails an operation
//! 3. No background threads
//! 4. Deterministic output ordering
//!
//! # Usage
//!
//! ```ignore
//! use dboptima::observability::{Event, Logger, MetricsRegistry};
//!
//! Logger::info("QUERIES_UPLOADED", &[("count", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_queries_analyzed();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{min_severity, set_min_severity, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a typed event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_error() {
        Severity::Error
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log a typed event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}
