//! Batch analysis
//!
//! Runs feature extraction, plan synthesis and recommendation over every
//! uploaded statement and keys each result by a stable query identifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::advisor::{recommend, RandomSource, Recommendation, ThreadRandom, FALLBACK_REASON};
use crate::analyzer::{extract_features, QueryFeatures};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::planner::{synthesize_plan, PlanNode};

use super::record::RawQuery;

/// Simulated execution time range in milliseconds, half-open.
const EXECUTION_TIME_MS: (u32, u32) = (500, 1500);

/// Full analysis of one statement
#[derive(Debug, Clone)]
pub struct QueryAnalysis {
    pub features: QueryFeatures,
    pub execution_plan: Vec<PlanNode>,
    pub recommendations: Vec<Recommendation>,
}

/// Presentation view of one analyzed statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysisBundle {
    pub query_id: String,
    /// Statement as uploaded
    pub sql: String,
    /// Referenced tables joined by `", "`
    pub tables: String,
    /// `"<n>ms"`
    pub execution_time: String,
    pub timestamp: String,
    pub file_name: String,
    pub execution_plan: Vec<PlanNode>,
    pub recommendations: Vec<Recommendation>,
}

impl QueryAnalysisBundle {
    pub fn recommendation(&self, id: u32) -> Option<&Recommendation> {
        self.recommendations.iter().find(|rec| rec.id == id)
    }
}

/// Bundles keyed by query identifier, plus the batch order of the keys
#[derive(Debug, Clone, Default)]
pub struct BatchAnalysis {
    bundles: HashMap<String, QueryAnalysisBundle>,
    order: Vec<String>,
}

impl BatchAnalysis {
    /// Rebuilds a batch from bundles in their original order.
    pub fn from_bundles(bundles: Vec<QueryAnalysisBundle>) -> Self {
        let mut batch = Self::default();
        for bundle in bundles {
            batch.push(bundle);
        }
        batch
    }

    /// Bundles in batch order, cloned for persistence
    pub fn to_bundles(&self) -> Vec<QueryAnalysisBundle> {
        self.iter().cloned().collect()
    }

    pub fn get(&self, query_key: &str) -> Option<&QueryAnalysisBundle> {
        self.bundles.get(query_key)
    }

    /// Keys in batch order
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Bundles in batch order
    pub fn iter(&self) -> impl Iterator<Item = &QueryAnalysisBundle> {
        self.order.iter().filter_map(|key| self.bundles.get(key))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn push(&mut self, bundle: QueryAnalysisBundle) {
        let key = bundle.query_id.clone();
        if self.bundles.insert(key.clone(), bundle).is_none() {
            self.order.push(key);
        }
    }
}

/// `<id>-<position>`, or `q<position>` when the record has no id.
pub fn query_key(raw: &RawQuery, position: usize) -> String {
    match raw.id() {
        Some(id) => format!("{}-{}", id, position),
        None => format!("q{}", position),
    }
}

/// Drives analysis over single statements and batches.
///
/// Never fails: the analysis core is total over any input text.
pub struct QueryAnalyzer<R = ThreadRandom> {
    rng: R,
    metrics: MetricsRegistry,
}

impl QueryAnalyzer<ThreadRandom> {
    pub fn new() -> Self {
        Self::with_random(ThreadRandom)
    }
}

impl Default for QueryAnalyzer<ThreadRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> QueryAnalyzer<R> {
    pub fn with_random(rng: R) -> Self {
        Self {
            rng,
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Analyzes one statement.
    pub fn analyze(&mut self, sql: &str) -> QueryAnalysis {
        let features = extract_features(sql);
        let execution_plan = synthesize_plan(&features);
        let recommendations = recommend(&features, &mut self.rng);

        self.metrics.increment_queries_analyzed();
        for rec in &recommendations {
            self.metrics.record_recommendation(rec.index_type);
        }
        if is_fallback_only(&recommendations) {
            self.metrics.increment_fallbacks();
        }

        let table_count = features.tables.len().to_string();
        let rec_count = recommendations.len().to_string();
        Logger::trace(
            Event::QueryAnalyzed.as_str(),
            &[
                ("recommendations", rec_count.as_str()),
                ("tables", table_count.as_str()),
            ],
        );

        QueryAnalysis {
            features,
            execution_plan,
            recommendations,
        }
    }

    /// Analyzes a batch, preserving the batch order.
    pub fn analyze_batch(&mut self, queries: &[RawQuery]) -> BatchAnalysis {
        let mut batch = BatchAnalysis::default();

        for (position, raw) in queries.iter().enumerate() {
            let analysis = self.analyze(&raw.text);
            let elapsed = self
                .rng
                .next_in_range(EXECUTION_TIME_MS.0, EXECUTION_TIME_MS.1);

            batch.push(QueryAnalysisBundle {
                query_id: query_key(raw, position),
                sql: raw.text.clone(),
                tables: analysis.features.tables.join(", "),
                execution_time: format!("{}ms", elapsed),
                timestamp: raw.timestamp.clone(),
                file_name: raw.source_file.clone(),
                execution_plan: analysis.execution_plan,
                recommendations: analysis.recommendations,
            });
        }

        self.metrics.increment_batches_analyzed();
        let count = batch.len().to_string();
        log_event_with_fields(Event::BatchAnalyzed, &[("queries", count.as_str())]);

        batch
    }
}

fn is_fallback_only(recommendations: &[Recommendation]) -> bool {
    matches!(recommendations, [only] if only.reason == FALLBACK_REASON)
}
