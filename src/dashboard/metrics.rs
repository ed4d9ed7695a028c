//! Simulated performance metrics
//!
//! All timings here are illustrative. Only counts and the index type
//! distribution are derived from stored data; the rest is drawn from the
//! random source and shaped by how many indexes were applied.

use serde::Serialize;

use crate::advisor::{IndexType, RandomSource};
use crate::orchestrator::{AppliedIndex, RawQuery};

/// Average "before" time range in milliseconds.
const BEFORE_TIME_MS: (u32, u32) = (500, 1000);
/// Per-query "before" time range for the comparison series.
const COMPARISON_BEFORE_MS: (u32, u32) = (500, 1300);
const COMPARISON_QUERIES: usize = 6;
const LABEL_CHARS: usize = 25;
const IMPROVED_QUERIES: usize = 5;
/// Ceiling of the improvement factor as applied indexes grow.
const MAX_IMPROVEMENT_FACTOR: f64 = 0.75;
/// Extra indexes assumed to exist beyond the applied ones.
const BASELINE_INDEXES: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexDistribution {
    #[serde(rename = "B-tree")]
    pub btree: usize,
    #[serde(rename = "Hash")]
    pub hash: usize,
    #[serde(rename = "Bitmap")]
    pub bitmap: usize,
}

impl IndexDistribution {
    /// Counts by type name; unknown names count as B-tree.
    pub fn from_applied(applied: &[AppliedIndex]) -> Self {
        let mut dist = Self::default();
        for record in applied {
            match IndexType::parse(&record.index_type) {
                Some(IndexType::Hash) => dist.hash += 1,
                Some(IndexType::Bitmap) => dist.bitmap += 1,
                Some(IndexType::BTree) | None => dist.btree += 1,
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.btree + self.hash + self.bitmap
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeries {
    pub labels: Vec<String>,
    pub before_data: Vec<u32>,
    pub after_data: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovedQuery {
    pub query: String,
    pub improvement: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub has_data: bool,
    pub before_time: u32,
    pub after_time: u32,
    /// Percent, one decimal
    pub improvement: f64,
    pub indexes_created: usize,
    pub total_indexes: usize,
    pub query_count: usize,
    pub index_distribution: IndexDistribution,
    pub comparison_data: ComparisonSeries,
    pub improved_queries: Vec<ImprovedQuery>,
}

impl DashboardMetrics {
    pub fn compute<R: RandomSource + ?Sized>(
        queries: &[RawQuery],
        applied: &[AppliedIndex],
        rng: &mut R,
    ) -> Self {
        let has_applied = !applied.is_empty();

        let before_time = rng.next_in_range(BEFORE_TIME_MS.0, BEFORE_TIME_MS.1);
        let factor = improvement_factor(applied.len());
        let after_time = (before_time as f64 * (1.0 - factor)).round() as u32;
        let improvement = if has_applied && before_time > 0 {
            round_one_decimal((before_time - after_time) as f64 / before_time as f64 * 100.0)
        } else {
            0.0
        };

        let mut comparison = ComparisonSeries::default();
        for query in queries.iter().take(COMPARISON_QUERIES) {
            comparison.labels.push(truncate_label(&query.text));
            let before = rng.next_in_range(COMPARISON_BEFORE_MS.0, COMPARISON_BEFORE_MS.1);
            let after = if has_applied {
                (before as f64 * (0.2 + rng.next_unit() * 0.3)).round() as u32
            } else {
                before
            };
            comparison.before_data.push(before);
            comparison.after_data.push(after);
        }

        let mut improved_queries = Vec::new();
        if has_applied {
            for i in 0..queries.len().min(IMPROVED_QUERIES) {
                let jitter = rng.next_in_range(0, 6);
                improved_queries.push(ImprovedQuery {
                    query: format!("Query #{}", i + 1),
                    improvement: 95 - 5 * i as u32 - jitter,
                });
            }
        }

        Self {
            has_data: !queries.is_empty(),
            before_time,
            after_time,
            improvement,
            indexes_created: applied.len(),
            total_indexes: applied.len() + BASELINE_INDEXES,
            query_count: queries.len(),
            index_distribution: IndexDistribution::from_applied(applied),
            comparison_data: comparison,
            improved_queries,
        }
    }
}

/// `0.75 * (1 - e^(-n/5))`, zero when nothing was applied.
pub fn improvement_factor(applied_count: usize) -> f64 {
    if applied_count == 0 {
        return 0.0;
    }
    MAX_IMPROVEMENT_FACTOR * (1.0 - (-(applied_count as f64) / 5.0).exp())
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// First 25 characters, with `...` when anything was cut.
fn truncate_label(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LABEL_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
