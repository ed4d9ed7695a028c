//! Explain output for synthetic plans
//!
//! Produces deterministic, human-readable plan text.

use std::fmt;

use super::node::PlanNode;
use super::synthesizer::total_cost;

/// Renderable view of a synthetic plan
#[derive(Debug, Clone)]
pub struct ExplainPlan {
    /// Statement as written by the user
    pub sql: String,
    /// Plan nodes in rendering order
    pub nodes: Vec<PlanNode>,
    /// Sum of node costs
    pub total_cost: u64,
}

impl ExplainPlan {
    pub fn new(sql: impl Into<String>, nodes: &[PlanNode]) -> Self {
        Self {
            sql: sql.into(),
            nodes: nodes.to_vec(),
            total_cost: total_cost(nodes),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXECUTION PLAN ===")?;
        writeln!(f, "Query: {}", self.sql)?;

        for (depth, node) in self.nodes.iter().enumerate() {
            let indent = "  ".repeat(depth);
            let arrow = if depth == 0 { "" } else { "-> " };
            writeln!(
                f,
                "{}{}{} (cost={}): {}",
                indent, arrow, node.label, node.cost, node.description
            )?;
        }

        writeln!(f, "Total Cost: {}", self.total_cost)?;
        Ok(())
    }
}
