//! SQL feature extraction for dboptima
//!
//! Pulls structural fragments out of raw SQL text using fixed textual
//! patterns. This is not a parser: every extraction is a total function with
//! a literal fallback, so malformed input still yields a well-formed feature
//! set.
//!
//! # Fallback literals
//!
//! - `unknown_table` when no FROM fragment matches
//! - `unknown conditions` when no WHERE fragment matches
//! - `unknown column` when no ORDER BY / GROUP BY fragment matches
//! - `unknown join condition` when no JOIN ... ON fragment matches
//!
//! Downstream code may compare against these literals to detect that nothing
//! usable was found.

mod aliases;
mod cardinality;
mod features;
mod join;
mod predicate;

pub use aliases::AliasMap;
pub use cardinality::{estimate_cardinality, is_low_cardinality, Cardinality};
pub use features::{
    extract_features, normalize_sql, QueryFeatures, UNKNOWN_COLUMN, UNKNOWN_CONDITIONS,
    UNKNOWN_JOIN_CONDITION, UNKNOWN_TABLE,
};
pub use join::{extract_join_pairs, JoinPair};
pub use predicate::{extract_where_columns, Operator, PredicateColumn};
