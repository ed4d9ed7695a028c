//! Index recommendation model and DDL rendering

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::Operator;

/// Index structure a recommendation proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    #[serde(rename = "B-tree")]
    BTree,
    #[serde(rename = "Hash")]
    Hash,
    #[serde(rename = "Bitmap")]
    Bitmap,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::BTree => "B-tree",
            IndexType::Hash => "Hash",
            IndexType::Bitmap => "Bitmap",
        }
    }

    /// Parses the external name. Returns `None` for anything else.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "B-tree" => Some(IndexType::BTree),
            "Hash" => Some(IndexType::Hash),
            "Bitmap" => Some(IndexType::Bitmap),
            _ => None,
        }
    }

    /// Trailing `USING` clause of the generated statement
    fn using_clause(&self) -> &'static str {
        match self {
            IndexType::BTree => "",
            IndexType::Hash => " USING HASH",
            IndexType::Bitmap => " USING BITMAP",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposed index for one query
///
/// `id` is scoped to the query it was produced for and starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: u32,
    #[serde(rename = "type")]
    pub index_type: IndexType,
    pub table: String,
    /// Never empty
    pub columns: Vec<String>,
    /// Estimated improvement percentage in `[0, 100]`
    pub improvement: u8,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub sql: String,
}

impl Recommendation {
    /// Builds a recommendation and renders its `CREATE INDEX` statement.
    pub fn new(
        id: u32,
        index_type: IndexType,
        table: impl Into<String>,
        columns: Vec<String>,
        improvement: u8,
        reason: impl Into<String>,
    ) -> Self {
        let table = table.into();
        let sql = generate_create_index_sql(index_type, &table, &columns);
        Self {
            id,
            index_type,
            table,
            columns,
            improvement: improvement.min(100),
            reason: reason.into(),
            operator: None,
            sql,
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Name of the index this recommendation would create
    pub fn index_name(&self) -> String {
        index_name(&self.table, &self.columns)
    }
}

/// `idx_<table>_<c1>_<c2>...`
///
/// Only the last segment of a dotted table name is used, and every character
/// outside `[a-z0-9_]` becomes `_`, so the result is always a bare
/// identifier.
pub fn index_name(table: &str, columns: &[String]) -> String {
    let table = table.rsplit('.').next().unwrap_or(table);
    let mut name = format!("idx_{}", sanitize_identifier(table));
    for column in columns {
        name.push('_');
        name.push_str(&sanitize_identifier(column));
    }
    name
}

/// Lower-cases and maps anything outside `[a-z0-9_]` to `_`.
fn sanitize_identifier(text: &str) -> String {
    text.chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `schema.table` with each segment sanitized
fn qualified_table(table: &str) -> String {
    table
        .split('.')
        .map(sanitize_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Renders `CREATE INDEX idx_<table>_<cols> ON <table> (<cols>)` with a
/// `USING` suffix for hash and bitmap indexes.
pub fn generate_create_index_sql(index_type: IndexType, table: &str, columns: &[String]) -> String {
    let columns_list = columns
        .iter()
        .map(|column| sanitize_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE INDEX {} ON {} ({}){}",
        index_name(table, columns),
        qualified_table(table),
        columns_list,
        index_type.using_clause()
    )
}
