//! # racost
//!
//! Heuristic cost annotation for relational-algebra query plans.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Upstream planner (SQL → relational algebra)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [PlanNode, lowering]
//! ┌─────────────────────────────────────────────────────────┐
//! │                RaTree (arena of operators)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │   ◀── TableStats (catalog row counts)
//!                          ▼ [cost estimator]
//! ┌─────────────────────────────────────────────────────────┐
//! │        CostAnnotations (cost, cumulative per node)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render / compare]
//! ┌─────────────────────────────────────────────────────────┐
//! │            EXPLAIN text, Graphviz DOT, JSON              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod metadata;
pub mod planner;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::metadata::TableStats;
    pub use crate::planner::cost::{
        compare_plans, estimate_cost, visualize_costs, CostAnnotations, CostComparison,
        CostEstimator, CostModel, NodeCost,
    };
    pub use crate::planner::logical::{NodeId, PlanNode, RaNode, RaTree};
    pub use crate::planner::render::{explain, to_dot};
    pub use crate::planner::{PlanError, PlanResult};
}

// Also export at crate root for convenience
pub use metadata::TableStats;
pub use planner::cost::{estimate_cost, visualize_costs, CostAnnotations, NodeCost};
pub use planner::logical::{NodeId, RaTree};
