//! JOIN clause extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `JOIN <table> [[AS] <alias>] ON <t1>.<c1> = <t2>.<c2>`
static JOIN_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)\bjoin\s+([a-z0-9_]+)(?:\s+(?:as\s+)?([a-z0-9_]+))?\s+on\s+([a-z0-9_]+)\.([a-z0-9_]+)\s*=\s*([a-z0-9_]+)\.([a-z0-9_]+)",
    )
    .expect("join pair pattern")
});

/// `JOIN <table> [[AS] <alias>]`, used for alias discovery
static JOIN_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bjoin\s+([a-z0-9_]+)(?:\s+as\b)?(?:\s+([a-z0-9_]+))?")
        .expect("join target pattern")
});

/// Column pair of an equi-join condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPair {
    /// Qualifier on the left of `=` (table or alias, as written)
    pub left_table: String,
    pub left_column: String,
    /// Qualifier on the right of `=` (table or alias, as written)
    pub right_table: String,
    pub right_column: String,
}

/// Extracts one pair per `JOIN ... ON a.x = b.y` occurrence, in source order.
pub fn extract_join_pairs(sql: &str) -> Vec<JoinPair> {
    JOIN_PAIR
        .captures_iter(sql)
        .map(|caps| JoinPair {
            left_table: caps[3].to_lowercase(),
            left_column: caps[4].to_lowercase(),
            right_table: caps[5].to_lowercase(),
            right_column: caps[6].to_lowercase(),
        })
        .collect()
}

/// Returns `(table, alias)` for every JOIN target.
///
/// The alias is whatever word follows the table; callers filter keywords.
pub(crate) fn extract_join_targets(sql: &str) -> Vec<(String, Option<String>)> {
    JOIN_TARGET
        .captures_iter(sql)
        .map(|caps| {
            (
                caps[1].to_lowercase(),
                caps.get(2).map(|m| m.as_str().to_lowercase()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_join_with_alias() {
        let pairs =
            extract_join_pairs("select o.id from orders o join customers c on o.customer_id = c.id");
        assert_eq!(
            pairs,
            vec![JoinPair {
                left_table: "o".into(),
                left_column: "customer_id".into(),
                right_table: "c".into(),
                right_column: "id".into(),
            }]
        );
    }

    #[test]
    fn test_join_with_as_alias() {
        let pairs = extract_join_pairs(
            "select * from orders o inner join customers as c on o.customer_id = c.id",
        );
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].right_table, "c");
    }

    #[test]
    fn test_join_without_alias() {
        let pairs = extract_join_pairs(
            "select * from orders join customers on orders.customer_id = customers.id",
        );
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left_table, "orders");
        assert_eq!(pairs[0].right_table, "customers");
    }

    #[test]
    fn test_multiple_joins_in_source_order() {
        let sql = "select * from orders o \
                   join customers c on o.customer_id = c.id \
                   left join items i on i.order_id = o.id";
        let pairs = extract_join_pairs(sql);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].left_column, "customer_id");
        assert_eq!(pairs[1].left_table, "i");
        assert_eq!(pairs[1].left_column, "order_id");
    }

    #[test]
    fn test_non_equi_join_ignored() {
        let pairs = extract_join_pairs("select * from a join b on a.x > b.y");
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_join_targets() {
        let targets = extract_join_targets(
            "select * from orders o join customers as c on o.cid = c.id join items on items.oid = o.id",
        );
        assert_eq!(targets[0], ("customers".to_string(), Some("c".to_string())));
        assert_eq!(targets[1], ("items".to_string(), Some("on".to_string())));
    }
}
