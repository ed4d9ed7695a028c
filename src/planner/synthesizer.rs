//! Execution plan synthesis
//!
//! Builds a plan that narratively resembles a planner's output. Operators are
//! detected in the order Sort, Group By, Filter, Hash Join and each one is
//! pushed to the front, so the rendered order is Hash Join, Filter, Group By,
//! Sort. Scan nodes are appended afterwards, one per table.
//!
//! Cost accounting (abstract units):
//!
//! | Operator  | Added after the node is built |
//! |-----------|-------------------------------|
//! | Sort      | 150                           |
//! | Group By  | 200                           |
//! | Filter    | 200                           |
//! | Hash Join | 300                           |

use std::collections::VecDeque;

use crate::analyzer::QueryFeatures;

use super::node::{NodeKind, PlanNode};

/// Running cost before any operator is added.
pub const BASE_COST: u64 = 100;

const SORT_COST: u64 = 150;
const GROUP_BY_COST: u64 = 200;
const FILTER_COST: u64 = 200;
const HASH_JOIN_COST: u64 = 300;

/// Synthesizes the ordered plan for the extracted features.
///
/// Deterministic: same features, same plan.
pub fn synthesize_plan(features: &QueryFeatures) -> Vec<PlanNode> {
    let mut plan = VecDeque::new();
    let mut cost = BASE_COST;

    if features.has_order_by {
        plan.push_front(PlanNode::operator(
            NodeKind::Sort,
            format!("Sort by {}", features.order_by_text),
            cost,
        ));
        cost += SORT_COST;
    }

    if features.has_group_by {
        plan.push_front(PlanNode::operator(
            NodeKind::GroupBy,
            format!("Group by {}", features.group_by_text),
            cost,
        ));
        cost += GROUP_BY_COST;
    }

    if features.has_where {
        plan.push_front(PlanNode::operator(
            NodeKind::Filter,
            features.where_text.clone(),
            cost,
        ));
        cost += FILTER_COST;
    }

    if features.has_join {
        plan.push_front(PlanNode::operator(
            NodeKind::HashJoin,
            features.join_condition_text.clone(),
            cost,
        ));
        cost += HASH_JOIN_COST;
    }

    for (idx, table) in features.tables.iter().enumerate() {
        plan.push_back(PlanNode::seq_scan(table, scan_cost(cost, idx, features.has_join)));
    }

    plan.into()
}

/// With a join, earlier tables carry more of the cost; otherwise every scan
/// gets half of the running total.
fn scan_cost(cost: u64, idx: usize, has_join: bool) -> u64 {
    let divisor = if has_join { idx as f64 + 1.5 } else { 2.0 };
    (cost as f64 / divisor).round() as u64
}

/// Sum of all node costs.
pub fn total_cost(plan: &[PlanNode]) -> u64 {
    plan.iter().filter_map(PlanNode::cost_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extract_features;

    fn labels(plan: &[PlanNode]) -> Vec<&str> {
        plan.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn test_scan_only() {
        let plan = synthesize_plan(&extract_features("SELECT * FROM t"));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].id, "seq_scan_t");
        assert_eq!(plan[0].cost, "50");
    }

    #[test]
    fn test_operator_order_is_reverse_of_detection() {
        let plan = synthesize_plan(&extract_features(
            "SELECT * FROM orders o JOIN customers c ON o.cid = c.id \
             WHERE o.amount > 5 GROUP BY o.region ORDER BY o.region",
        ));
        assert_eq!(
            labels(&plan),
            vec!["Hash Join", "Filter", "Group By", "Sort", "Seq Scan"]
        );
    }

    #[test]
    fn test_costs_accumulate() {
        let plan = synthesize_plan(&extract_features(
            "SELECT * FROM orders WHERE amount > 5 ORDER BY created_at",
        ));
        // Sort built first at 100, Filter at 250, scan at round(450 / 2)
        assert_eq!(plan[0].id, "filter");
        assert_eq!(plan[0].cost, "250");
        assert_eq!(plan[1].id, "sort");
        assert_eq!(plan[1].cost, "100");
        assert_eq!(plan[1].description, "Sort by created_at");
        assert_eq!(plan[2].cost, "225");
        assert_eq!(total_cost(&plan), 575);
    }

    #[test]
    fn test_join_scan_costs_decrease_by_position() {
        let plan = synthesize_plan(&extract_features(
            "SELECT * FROM orders, customers JOIN items i ON i.oid = orders.id",
        ));
        // Join at 100, running cost 400
        let scans: Vec<&PlanNode> = plan.iter().filter(|n| n.label == "Seq Scan").collect();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].cost, "267"); // 400 / 1.5
        assert_eq!(scans[1].cost, "160"); // 400 / 2.5
    }

    #[test]
    fn test_non_join_scans_share_cost() {
        let plan = synthesize_plan(&extract_features("SELECT * FROM a, b WHERE a.x = 1"));
        let scans: Vec<&str> = plan
            .iter()
            .filter(|n| n.label == "Seq Scan")
            .map(|n| n.cost.as_str())
            .collect();
        assert_eq!(scans, vec!["150", "150"]);
    }

    #[test]
    fn test_unknown_table_still_scanned() {
        let plan = synthesize_plan(&extract_features("DELETE"));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].description, "unknown_table");
    }

    #[test]
    fn test_group_by_description() {
        let plan = synthesize_plan(&extract_features("SELECT k FROM t GROUP BY k"));
        assert_eq!(plan[0].description, "Group by k");
        assert_eq!(plan[0].cost, "100");
    }
}
