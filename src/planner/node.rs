//! Plan node representation

use serde::{Deserialize, Serialize};

/// Physical operator kind of a synthetic plan node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    HashJoin,
    Filter,
    GroupBy,
    Sort,
    SeqScan,
}

impl NodeKind {
    /// Display label of the operator
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::HashJoin => "Hash Join",
            NodeKind::Filter => "Filter",
            NodeKind::GroupBy => "Group By",
            NodeKind::Sort => "Sort",
            NodeKind::SeqScan => "Seq Scan",
        }
    }

    /// Stable node id prefix
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeKind::HashJoin => "hash_join",
            NodeKind::Filter => "filter",
            NodeKind::GroupBy => "groupby",
            NodeKind::Sort => "sort",
            NodeKind::SeqScan => "seq_scan",
        }
    }
}

/// One step of a synthetic execution plan
///
/// `cost` is an abstract cost number rendered as text, not wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: String,
    pub label: String,
    pub description: String,
    pub cost: String,
}

impl PlanNode {
    /// Creates a non-scan node; the id is the operator's prefix.
    pub fn operator(kind: NodeKind, description: impl Into<String>, cost: u64) -> Self {
        Self {
            id: kind.id_prefix().to_string(),
            label: kind.label().to_string(),
            description: description.into(),
            cost: cost.to_string(),
        }
    }

    /// Creates a sequential scan node for `table`.
    pub fn seq_scan(table: &str, cost: u64) -> Self {
        Self {
            id: format!("{}_{}", NodeKind::SeqScan.id_prefix(), table),
            label: NodeKind::SeqScan.label().to_string(),
            description: table.to_string(),
            cost: cost.to_string(),
        }
    }

    /// Numeric cost, if the text is a number
    pub fn cost_value(&self) -> Option<u64> {
        self.cost.parse().ok()
    }
}
