//! Synthetic execution plans for dboptima
//!
//! There is no real planner behind these plans. The synthesizer turns
//! extracted query features into an ordered list of cost-annotated nodes
//! that reads like a planner's output, so a user can see why an index would
//! help.
//!
//! # Design Principles
//!
//! - Deterministic: same features → same plan
//! - Physical-operator-first ordering: Hash Join, Filter, Group By, Sort
//! - Scans last, one per referenced table

mod explain;
mod node;
mod synthesizer;

pub use explain::ExplainPlan;
pub use node::{NodeKind, PlanNode};
pub use synthesizer::{synthesize_plan, total_cost, BASE_COST};
