//! WHERE predicate column extraction

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Splits a WHERE fragment into conditions on standalone AND / OR.
static CONDITION_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:and|or)\s+").expect("condition split pattern"));

/// `identifier[.identifier] operator rest`
///
/// Two-character operators are listed before their one-character prefixes.
/// Word operators need whitespace on both sides.
static PREDICATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)^\s*\(*\s*([a-z0-9_]+)(?:\.([a-z0-9_]+))?(?:\s*(>=|<=|!=|=|>|<)|\s+(like|in)\b)\s*.+",
    )
    .expect("predicate pattern")
});

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "in")]
    In,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::NotEq => "!=",
            Operator::Like => "like",
            Operator::In => "in",
        }
    }

    /// Parses an operator token (case-insensitive for word operators).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "=" => Some(Operator::Eq),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Gte),
            "<=" => Some(Operator::Lte),
            "!=" => Some(Operator::NotEq),
            "like" => Some(Operator::Like),
            "in" => Some(Operator::In),
            _ => None,
        }
    }

    /// Returns true for plain equality
    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Eq)
    }

    /// Returns true for pattern matching
    pub fn is_pattern(&self) -> bool {
        matches!(self, Operator::Like)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A column referenced in a WHERE condition together with its operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateColumn {
    /// Table or alias qualifier, if the column was qualified
    pub table: Option<String>,
    pub column: String,
    pub operator: Operator,
}

impl PredicateColumn {
    pub fn new(table: Option<String>, column: impl Into<String>, operator: Operator) -> Self {
        Self {
            table,
            column: column.into(),
            operator,
        }
    }
}

/// Extracts predicate columns from a WHERE fragment.
///
/// Conditions that do not look like `column op value` are dropped.
pub fn extract_where_columns(where_text: &str) -> Vec<PredicateColumn> {
    CONDITION_SPLIT
        .split(where_text)
        .filter_map(parse_condition)
        .collect()
}

fn parse_condition(condition: &str) -> Option<PredicateColumn> {
    let caps = PREDICATE.captures(condition)?;

    let first = caps.get(1)?.as_str().to_lowercase();
    let operator = caps
        .get(3)
        .or_else(|| caps.get(4))
        .and_then(|m| Operator::parse(m.as_str()))?;

    match caps.get(2) {
        Some(column) => Some(PredicateColumn::new(
            Some(first),
            column.as_str().to_lowercase(),
            operator,
        )),
        None => Some(PredicateColumn::new(None, first, operator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_equality() {
        let cols = extract_where_columns("status = 'x'");
        assert_eq!(cols, vec![PredicateColumn::new(None, "status", Operator::Eq)]);
    }

    #[test]
    fn test_qualified_column() {
        let cols = extract_where_columns("o.amount > 1000");
        assert_eq!(
            cols,
            vec![PredicateColumn::new(Some("o".into()), "amount", Operator::Gt)]
        );
    }

    #[test]
    fn test_two_char_operators() {
        let cols = extract_where_columns("age >= 18 and age <= 30 and kind != 'a'");
        let ops: Vec<Operator> = cols.iter().map(|c| c.operator).collect();
        assert_eq!(ops, vec![Operator::Gte, Operator::Lte, Operator::NotEq]);
    }

    #[test]
    fn test_word_operators() {
        let cols = extract_where_columns("name like '%ann%' or country in ('us', 'ca')");
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].operator, Operator::Like);
        assert_eq!(cols[1].column, "country");
        assert_eq!(cols[1].operator, Operator::In);
    }

    #[test]
    fn test_split_ignores_and_or_inside_identifiers() {
        // "order_date" contains "or", "brand" contains "and"
        let cols = extract_where_columns("order_date > '2024-01-01' and brand = 'acme'");
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].column, "order_date");
        assert_eq!(cols[1].column, "brand");
    }

    #[test]
    fn test_non_matching_fragments_dropped() {
        let cols = extract_where_columns("exists (select 1) and total < 5");
        assert_eq!(cols, vec![PredicateColumn::new(None, "total", Operator::Lt)]);
    }

    #[test]
    fn test_leading_parenthesis() {
        let cols = extract_where_columns("(priority = 1 or priority = 2)");
        assert_eq!(cols.len(), 2);
        assert!(cols.iter().all(|c| c.column == "priority"));
    }

    #[test]
    fn test_operator_round_trip_strings() {
        for op in ["=", ">", "<", ">=", "<=", "!=", "like", "in"] {
            assert_eq!(Operator::parse(op).map(|o| o.as_str()), Some(op));
        }
        assert_eq!(Operator::parse("LIKE"), Some(Operator::Like));
        assert_eq!(Operator::parse("between"), None);
    }

    #[test]
    fn test_operator_serializes_as_symbol() {
        let json = serde_json::to_string(&Operator::Gte).unwrap();
        assert_eq!(json, "\">=\"");
    }
}
