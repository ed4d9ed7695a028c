//! Dashboard view over stored queries and applied indexes

mod matching;
mod metrics;

pub use matching::{applied_for_query, normalize_query_id};
pub use metrics::{
    improvement_factor, ComparisonSeries, DashboardMetrics, ImprovedQuery, IndexDistribution,
};
