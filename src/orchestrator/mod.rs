//! Analysis orchestration for dboptima
//!
//! Takes uploaded query records, runs the full analysis over each and keys
//! the results for presentation. Also owns the apply action, which turns a
//! chosen recommendation into a persisted applied-index record.
//!
//! # Design Principles
//!
//! - Batch order is preserved
//! - Query keys are `<record id>-<batch position>`
//! - Analysis never fails; only persistence can

mod applied;
mod batch;
mod record;

pub use applied::{apply_recommendation, AppliedIndex, AppliedSet};
pub use batch::{query_key, BatchAnalysis, QueryAnalysis, QueryAnalysisBundle, QueryAnalyzer};
pub use record::{RawQuery, UNKNOWN_FILE};
