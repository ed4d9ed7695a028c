//! Structural feature extraction
//!
//! Each fragment is the text between a clause keyword and the next
//! terminating keyword (or the end of the statement). Keywords are matched on
//! word boundaries against the lower-cased statement.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::aliases::AliasMap;
use super::join::{extract_join_pairs, JoinPair};
use super::predicate::{extract_where_columns, PredicateColumn};

/// Table name used when no FROM fragment is found.
pub const UNKNOWN_TABLE: &str = "unknown_table";
/// WHERE text used when no WHERE fragment is found.
pub const UNKNOWN_CONDITIONS: &str = "unknown conditions";
/// ORDER BY / GROUP BY text used when no fragment is found.
pub const UNKNOWN_COLUMN: &str = "unknown column";
/// JOIN condition text used when no JOIN ... ON fragment is found.
pub const UNKNOWN_JOIN_CONDITION: &str = "unknown join condition";

static FROM_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\bfrom\s+(.+?)(?:\s+where\b|\s+group\b|\s+order\b|\s+limit\b|$)")
        .expect("from pattern")
});

static WHERE_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\bwhere\s+(.+?)(?:\s+group\b|\s+order\b|\s+limit\b|$)")
        .expect("where pattern")
});

static ORDER_BY_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\border\s+by\s+(.+?)(?:\s+limit\b|$)").expect("order by pattern")
});

static GROUP_BY_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\bgroup\s+by\s+(.+?)(?:\s+having\b|\s+order\b|\s+limit\b|$)")
        .expect("group by pattern")
});

static JOIN_CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)\bjoin\s+[a-z0-9_]+(?:\s+(?:as\s+)?[a-z0-9_]+)?\s+on\s+(.+?)(?:\s+where\b|\s+group\b|\s+order\b|\s+limit\b|$)",
    )
    .expect("join condition pattern")
});

/// `column` or `qualifier.column`, then optional direction and null ordering
static ORDER_BY_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([a-z_][a-z0-9_]*(?:\.[a-z_][a-z0-9_]*)?)(?:\s+(?:asc|desc))?(?:\s+nulls\s+(?:first|last))?$",
    )
    .expect("order by entry pattern")
});

static HAS_JOIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bjoin\b").expect("join keyword"));
static HAS_WHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bwhere\b").expect("where keyword"));
static HAS_ORDER_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\border\s+by\b").expect("order by keyword"));
static HAS_GROUP_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bgroup\s+by\b").expect("group by keyword"));

/// Structural features of one SQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFeatures {
    /// Referenced tables; never empty
    pub tables: Vec<String>,
    pub has_join: bool,
    pub has_where: bool,
    pub has_order_by: bool,
    pub has_group_by: bool,
    pub where_text: String,
    pub order_by_text: String,
    pub group_by_text: String,
    pub join_condition_text: String,
    /// Predicate columns of the WHERE fragment
    pub where_columns: Vec<PredicateColumn>,
    /// Equi-join column pairs in source order
    pub join_pairs: Vec<JoinPair>,
    /// ORDER BY columns, direction keywords stripped
    pub order_by_columns: Vec<String>,
    #[serde(skip)]
    pub aliases: AliasMap,
}

impl QueryFeatures {
    /// First referenced table (the fallback table when none was found)
    pub fn primary_table(&self) -> &str {
        self.tables
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_TABLE)
    }

    /// Returns true if no FROM fragment was found
    pub fn is_unknown_table(&self) -> bool {
        self.tables.len() == 1 && self.tables[0] == UNKNOWN_TABLE
    }

    /// Resolves a table qualifier through the alias map
    pub fn resolve_table(&self, qualifier: &str) -> String {
        self.aliases.resolve(qualifier)
    }
}

/// Lower-cases the statement and strips surrounding whitespace and trailing
/// statement terminators.
pub fn normalize_sql(sql: &str) -> String {
    sql.trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace())
        .to_lowercase()
}

/// Extracts all structural features from a SQL statement.
///
/// Total over any input: missing fragments fall back to the literal
/// placeholders of this module.
pub fn extract_features(sql: &str) -> QueryFeatures {
    let query = normalize_sql(sql);

    let from_fragment = capture(&FROM_CLAUSE, &query);
    let where_fragment = capture(&WHERE_CLAUSE, &query);
    let order_by_fragment = capture(&ORDER_BY_CLAUSE, &query);
    let group_by_fragment = capture(&GROUP_BY_CLAUSE, &query);
    let join_fragment = capture(&JOIN_CONDITION, &query);

    let tables = from_fragment
        .as_deref()
        .map(split_tables)
        .filter(|tables| !tables.is_empty())
        .unwrap_or_else(|| vec![UNKNOWN_TABLE.to_string()]);

    let where_columns = where_fragment
        .as_deref()
        .map(extract_where_columns)
        .unwrap_or_default();

    let order_by_columns = order_by_fragment
        .as_deref()
        .map(split_order_columns)
        .unwrap_or_default();

    let aliases = AliasMap::from_clauses(from_fragment.as_deref(), &query);

    QueryFeatures {
        tables,
        has_join: HAS_JOIN.is_match(&query),
        has_where: HAS_WHERE.is_match(&query),
        has_order_by: HAS_ORDER_BY.is_match(&query),
        has_group_by: HAS_GROUP_BY.is_match(&query),
        where_text: where_fragment.unwrap_or_else(|| UNKNOWN_CONDITIONS.to_string()),
        order_by_text: order_by_fragment.unwrap_or_else(|| UNKNOWN_COLUMN.to_string()),
        group_by_text: group_by_fragment.unwrap_or_else(|| UNKNOWN_COLUMN.to_string()),
        join_condition_text: join_fragment
            .unwrap_or_else(|| UNKNOWN_JOIN_CONDITION.to_string()),
        where_columns,
        join_pairs: extract_join_pairs(&query),
        order_by_columns,
        aliases,
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Comma-separated entries, first token of each (aliases dropped).
fn split_tables(fragment: &str) -> Vec<String> {
    fragment
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .map(|token| {
            token
                .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
                .to_string()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Comma-separated ORDER BY entries with `nulls first|last` and `asc` /
/// `desc` dropped.
///
/// Entries that are not a plain or qualified column (expressions, function
/// calls, positional numbers) are skipped.
fn split_order_columns(fragment: &str) -> Vec<String> {
    fragment
        .split(',')
        .filter_map(|entry| {
            let caps = ORDER_BY_ENTRY.captures(entry.trim())?;
            Some(caps[1].to_string())
        })
        .collect()
}
