//! Cost estimation - prices every operator of a relational-algebra plan.
//!
//! ```
//! use racost::metadata::TableStats;
//! use racost::planner::cost::estimate_cost;
//! use racost::planner::logical::RaTree;
//!
//! let mut tree = RaTree::new();
//! let orders = tree.relation("orders");
//! let filter = tree.selection("orders.total > 10", orders);
//!
//! let stats: TableStats = [("orders", 1000)].into_iter().collect();
//! let costs = estimate_cost(&tree, filter, &stats)?;
//!
//! assert_eq!(costs.cost(filter), Some(100.0));
//! assert_eq!(costs.cumulative_cost(filter), Some(1100.0));
//! # Ok::<(), racost::planner::PlanError>(())
//! ```

mod compare;
mod estimator;
mod model;

pub use compare::{compare_costs, compare_plans, CostComparison, DEFAULT_TOLERANCE};
pub use estimator::{CostAnnotations, CostEstimator, NodeCost};
pub use model::*;

use crate::metadata::TableStats;
use crate::planner::logical::{NodeId, RaTree};
use crate::planner::PlanResult;

/// Estimate `root` and its descendants with the default cost model.
pub fn estimate_cost(
    tree: &RaTree,
    root: NodeId,
    stats: &TableStats,
) -> PlanResult<CostAnnotations> {
    CostEstimator::new(stats).estimate(tree, root)
}

/// Show-costs step run after estimation.
///
/// Does nothing: annotated plans are printed through
/// [`render::explain`](crate::planner::render::explain) and
/// [`render::to_dot`](crate::planner::render::to_dot).
pub fn visualize_costs(_tree: &RaTree, _root: NodeId, _annotations: &CostAnnotations) {}
