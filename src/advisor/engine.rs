//! Rule-based recommendation engine
//!
//! Rules fire in a fixed order and accumulate:
//!
//! 1. one index per WHERE predicate column
//! 2. one index per join pair, sometimes a second on the other side
//! 3. one composite B-tree for ORDER BY
//! 4. a primary key fallback when nothing else fired
//!
//! Ids are assigned sequentially from 1 within one query.

use crate::analyzer::{is_low_cardinality, Operator, PredicateColumn, QueryFeatures};

use super::random::RandomSource;
use super::recommendation::{IndexType, Recommendation};

const REASON_BITMAP: &str =
    "Low-cardinality column with equality filter - bitmap provides compact storage";
const REASON_HASH: &str = "Frequent equality comparisons - hash index provides O(1) lookups";
const REASON_PATTERN: &str = "Pattern matching queries benefit from B-tree indexes";
const REASON_RANGE: &str = "Range-based filtering - B-tree supports efficient range scans";
const REASON_JOIN: &str = "Improves join performance";
const REASON_JOIN_SECONDARY: &str = "Improves join performance on secondary table";
const REASON_ORDER_BY: &str = "Improves ORDER BY performance";
pub const FALLBACK_REASON: &str = "General improvement for primary key lookups";

/// Improvement of the primary key fallback
pub const FALLBACK_IMPROVEMENT: u8 = 35;

/// Column indexed by the fallback rule
pub const FALLBACK_COLUMN: &str = "id";

const PREDICATE_RANGE: (u32, u32) = (40, 80);
const JOIN_RANGE: (u32, u32) = (50, 80);
const JOIN_SECONDARY_PENALTY: u32 = 10;
const ORDER_BY_RANGE: (u32, u32) = (30, 60);

/// Recommends indexes for one query's features.
///
/// Always returns at least one recommendation.
pub fn recommend<R: RandomSource + ?Sized>(
    features: &QueryFeatures,
    rng: &mut R,
) -> Vec<Recommendation> {
    let mut builder = Builder::default();

    for predicate in &features.where_columns {
        let table = predicate_table(features, predicate);
        let improvement = draw(rng, PREDICATE_RANGE);
        let (index_type, reason) = classify_predicate(predicate);

        let rec = builder
            .next(index_type, table, vec![predicate.column.clone()], improvement, reason)
            .with_operator(predicate.operator);
        builder.push(rec);
    }

    for pair in &features.join_pairs {
        let improvement = draw(rng, JOIN_RANGE);
        let rec = builder.next(
            IndexType::BTree,
            features.resolve_table(&pair.left_table),
            vec![pair.left_column.clone()],
            improvement,
            REASON_JOIN,
        );
        builder.push(rec);

        if rng.coin_flip() {
            let penalty = rng.next_in_range(0, JOIN_SECONDARY_PENALTY) as u8;
            let rec = builder.next(
                IndexType::BTree,
                features.resolve_table(&pair.right_table),
                vec![pair.right_column.clone()],
                improvement.saturating_sub(penalty),
                REASON_JOIN_SECONDARY,
            );
            builder.push(rec);
        }
    }

    if features.has_order_by {
        if let Some((table, columns)) = order_by_target(features) {
            let improvement = draw(rng, ORDER_BY_RANGE);
            let rec = builder.next(IndexType::BTree, table, columns, improvement, REASON_ORDER_BY);
            builder.push(rec);
        }
    }

    if builder.is_empty() {
        let rec = builder.next(
            IndexType::BTree,
            features.primary_table().to_string(),
            vec![FALLBACK_COLUMN.to_string()],
            FALLBACK_IMPROVEMENT,
            FALLBACK_REASON,
        );
        builder.push(rec);
    }

    builder.finish()
}

/// Index kind and reason for a WHERE predicate
fn classify_predicate(predicate: &PredicateColumn) -> (IndexType, &'static str) {
    match predicate.operator {
        Operator::Eq if is_low_cardinality(&predicate.column) => (IndexType::Bitmap, REASON_BITMAP),
        Operator::Eq => (IndexType::Hash, REASON_HASH),
        Operator::Like => (IndexType::BTree, REASON_PATTERN),
        _ => (IndexType::BTree, REASON_RANGE),
    }
}

fn predicate_table(features: &QueryFeatures, predicate: &PredicateColumn) -> String {
    match &predicate.table {
        Some(qualifier) => features.resolve_table(qualifier),
        None => features.primary_table().to_string(),
    }
}

/// Table and columns of the composite ORDER BY index.
///
/// Qualifiers are resolved through the alias map; unqualified columns belong
/// to the first table. The index targets the first table when any column
/// belongs to it, otherwise the table of the first column. Columns of other
/// tables are left out.
fn order_by_target(features: &QueryFeatures) -> Option<(String, Vec<String>)> {
    let resolved: Vec<(String, String)> = features
        .order_by_columns
        .iter()
        .map(|column| match column.rsplit_once('.') {
            Some((qualifier, name)) => (features.resolve_table(qualifier), name.to_string()),
            None => (features.primary_table().to_string(), column.clone()),
        })
        .collect();

    let primary = features.primary_table();
    let table = if resolved.iter().any(|(table, _)| table == primary) {
        primary.to_string()
    } else {
        resolved.first()?.0.clone()
    };

    let columns: Vec<String> = resolved
        .into_iter()
        .filter(|(owner, _)| *owner == table)
        .map(|(_, column)| column)
        .collect();

    Some((table, columns))
}

fn draw<R: RandomSource + ?Sized>(rng: &mut R, (low, high): (u32, u32)) -> u8 {
    rng.next_in_range(low, high).min(100) as u8
}

/// Assigns sequential ids
#[derive(Default)]
struct Builder {
    recommendations: Vec<Recommendation>,
}

impl Builder {
    fn next(
        &self,
        index_type: IndexType,
        table: String,
        columns: Vec<String>,
        improvement: u8,
        reason: &str,
    ) -> Recommendation {
        let id = self.recommendations.len() as u32 + 1;
        Recommendation::new(id, index_type, table, columns, improvement, reason)
    }

    fn push(&mut self, rec: Recommendation) {
        self.recommendations.push(rec);
    }

    fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    fn finish(self) -> Vec<Recommendation> {
        self.recommendations
    }
}
