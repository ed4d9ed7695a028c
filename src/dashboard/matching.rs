//! Matching applied records back to uploaded queries

use crate::orchestrator::{AppliedIndex, RawQuery};

/// Strips the `-<position>` suffix of a query key.
///
/// Ids without a `-` are returned unchanged.
pub fn normalize_query_id(query_id: &str) -> &str {
    query_id
        .split_once('-')
        .map(|(id, _)| id)
        .unwrap_or(query_id)
}

/// Applied records whose normalized query id equals the query's id.
///
/// A query without an id matches nothing.
pub fn applied_for_query<'a>(query: &RawQuery, applied: &'a [AppliedIndex]) -> Vec<&'a AppliedIndex> {
    let Some(id) = query.id() else {
        return Vec::new();
    };

    applied
        .iter()
        .filter(|record| normalize_query_id(&record.query_id) == id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(query_id: &str, id: u32) -> AppliedIndex {
        AppliedIndex {
            id,
            query_id: query_id.to_string(),
            index_name: "idx_t_a".into(),
            table_name: "t".into(),
            columns: vec!["a".into()],
            index_type: "B-tree".into(),
            improvement: 50,
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_normalize_strips_suffix() {
        assert_eq!(normalize_query_id("abc-3"), "abc");
        assert_eq!(normalize_query_id("abc"), "abc");
        assert_eq!(normalize_query_id("abc-3-7"), "abc");
    }

    #[test]
    fn test_matches_by_normalized_id() {
        let records = vec![applied("abc-0", 1), applied("abc-4", 2), applied("xyz-1", 1)];
        let query = RawQuery::new("SELECT 1").with_id("abc");

        let matched = applied_for_query(&query, &records);
        let ids: Vec<u32> = matched.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_query_without_id_matches_nothing() {
        let records = vec![applied("q0", 1)];
        assert!(applied_for_query(&RawQuery::new("x"), &records).is_empty());
    }
}
