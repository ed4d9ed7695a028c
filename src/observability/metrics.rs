//! Analysis counters
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, Relaxed ordering

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::advisor::IndexType;

/// Counters for one analyzer instance
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Statements analyzed
    queries_analyzed: AtomicU64,
    /// Batches analyzed
    batches_analyzed: AtomicU64,
    /// Recommendations produced, all kinds
    recommendations_emitted: AtomicU64,
    btree_recommendations: AtomicU64,
    hash_recommendations: AtomicU64,
    bitmap_recommendations: AtomicU64,
    /// Statements that only got the primary key fallback
    fallback_recommendations: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_analyzed(&self) {
        self.queries_analyzed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_batches_analyzed(&self) {
        self.batches_analyzed.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one emitted recommendation of the given index type.
    pub fn record_recommendation(&self, index_type: IndexType) {
        self.recommendations_emitted.fetch_add(1, Ordering::Relaxed);
        let counter = match index_type {
            IndexType::BTree => &self.btree_recommendations,
            IndexType::Hash => &self.hash_recommendations,
            IndexType::Bitmap => &self.bitmap_recommendations,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fallbacks(&self) {
        self.fallback_recommendations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn queries_analyzed(&self) -> u64 {
        self.queries_analyzed.load(Ordering::Relaxed)
    }

    /// Current values as compact JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_analyzed: self.queries_analyzed.load(Ordering::Relaxed),
            batches_analyzed: self.batches_analyzed.load(Ordering::Relaxed),
            recommendations_emitted: self.recommendations_emitted.load(Ordering::Relaxed),
            btree_recommendations: self.btree_recommendations.load(Ordering::Relaxed),
            hash_recommendations: self.hash_recommendations.load(Ordering::Relaxed),
            bitmap_recommendations: self.bitmap_recommendations.load(Ordering::Relaxed),
            fallback_recommendations: self.fallback_recommendations.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub queries_analyzed: u64,
    pub batches_analyzed: u64,
    pub recommendations_emitted: u64,
    pub btree_recommendations: u64,
    pub hash_recommendations: u64,
    pub bitmap_recommendations: u64,
    pub fallback_recommendations: u64,
}
