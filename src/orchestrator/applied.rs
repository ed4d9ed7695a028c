//! Applied-index records and the apply action

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::advisor::Recommendation;
use crate::observability::{log_event_with_fields, Event};
use crate::store::{RecordStore, StoreError, StoreResult};

use super::batch::BatchAnalysis;

/// A recommendation the user chose to apply
///
/// `id` is the recommendation id, which is only unique together with
/// `query_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedIndex {
    pub id: u32,
    pub query_id: String,
    pub index_name: String,
    pub table_name: String,
    pub columns: Vec<String>,
    /// External index type name; unknown names are kept as written
    #[serde(rename = "type", default)]
    pub index_type: String,
    #[serde(default)]
    pub improvement: u8,
    #[serde(default)]
    pub timestamp: String,
}

impl AppliedIndex {
    /// Derives the record for applying `rec` to the query keyed `query_key`.
    pub fn from_recommendation(query_key: &str, rec: &Recommendation) -> Self {
        Self {
            id: rec.id,
            query_id: query_key.to_string(),
            index_name: rec.index_name(),
            table_name: rec.table.clone(),
            columns: rec.columns.clone(),
            index_type: rec.index_type.as_str().to_string(),
            improvement: rec.improvement,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Key identifying the applied recommendation
    pub fn key(&self) -> (String, u32) {
        (self.query_id.clone(), self.id)
    }
}

/// Set of applied `(query id, recommendation id)` pairs
#[derive(Debug, Clone, Default)]
pub struct AppliedSet {
    keys: HashSet<(String, u32)>,
}

impl AppliedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[AppliedIndex]) -> Self {
        Self {
            keys: records.iter().map(AppliedIndex::key).collect(),
        }
    }

    /// Returns true if the pair was not already present.
    pub fn insert(&mut self, query_id: impl Into<String>, recommendation_id: u32) -> bool {
        self.keys.insert((query_id.into(), recommendation_id))
    }

    pub fn contains(&self, query_id: &str, recommendation_id: u32) -> bool {
        self.keys
            .contains(&(query_id.to_string(), recommendation_id))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Persists recommendation `recommendation_id` of query `query_key` as
/// applied for `principal` and returns the stored record.
pub fn apply_recommendation<S>(
    batch: &BatchAnalysis,
    query_key: &str,
    recommendation_id: u32,
    store: &S,
    principal: &str,
) -> StoreResult<AppliedIndex>
where
    S: RecordStore<AppliedIndex> + ?Sized,
{
    let bundle = batch
        .get(query_key)
        .ok_or_else(|| StoreError::QueryNotFound(query_key.to_string()))?;

    let rec = bundle.recommendation(recommendation_id).ok_or_else(|| {
        StoreError::RecommendationNotFound {
            query_id: query_key.to_string(),
            recommendation_id,
        }
    })?;

    let applied = AppliedIndex::from_recommendation(query_key, rec);
    store.insert(principal, &applied)?;

    log_event_with_fields(
        Event::RecommendationApplied,
        &[
            ("index", applied.index_name.as_str()),
            ("query_id", query_key),
        ],
    );

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::SeededRandom;
    use crate::orchestrator::{QueryAnalyzer, RawQuery};
    use crate::store::MemoryStore;

    fn batch() -> BatchAnalysis {
        QueryAnalyzer::with_random(SeededRandom::new(11)).analyze_batch(&[
            RawQuery::new("SELECT * FROM orders WHERE order_id = 7").with_id("abc"),
        ])
    }

    #[test]
    fn test_from_recommendation() {
        let batch = batch();
        let rec = &batch.get("abc-0").unwrap().recommendations[0];
        let applied = AppliedIndex::from_recommendation("abc-0", rec);

        assert_eq!(applied.id, 1);
        assert_eq!(applied.index_name, "idx_orders_order_id");
        assert_eq!(applied.table_name, "orders");
        assert_eq!(applied.index_type, "Hash");
        assert_eq!(applied.improvement, rec.improvement);
    }

    #[test]
    fn test_apply_persists() {
        let batch = batch();
        let store = MemoryStore::new();

        let applied = apply_recommendation(&batch, "abc-0", 1, &store, "guest").unwrap();
        assert_eq!(store.list("guest").unwrap(), vec![applied]);
    }

    #[test]
    fn test_apply_unknown_query() {
        let store = MemoryStore::new();
        let err = apply_recommendation(&batch(), "nope-0", 1, &store, "guest").unwrap_err();
        assert!(matches!(err, StoreError::QueryNotFound(_)));
    }

    #[test]
    fn test_apply_unknown_recommendation() {
        let store = MemoryStore::new();
        let err = apply_recommendation(&batch(), "abc-0", 99, &store, "guest").unwrap_err();
        assert!(matches!(
            err,
            StoreError::RecommendationNotFound {
                recommendation_id: 99,
                ..
            }
        ));
        assert!(store.list("guest").unwrap().is_empty());
    }

    #[test]
    fn test_applied_set_keyed_by_pair() {
        let mut set = AppliedSet::new();
        assert!(set.insert("a-0", 1));
        assert!(!set.insert("a-0", 1));
        set.insert("b-1", 1);

        assert!(set.contains("a-0", 1));
        assert!(!set.contains("a-0", 2));
        assert!(set.contains("b-1", 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_record_external_names() {
        let json = r#"{"id":2,"queryId":"x-0","indexName":"idx_t_a","tableName":"t",
                       "columns":["a"],"type":"GiST"}"#;
        let applied: AppliedIndex = serde_json::from_str(json).unwrap();
        assert_eq!(applied.index_type, "GiST");
        assert_eq!(applied.improvement, 0);
    }
}
