//! Query plan costing - annotates relational-algebra trees with estimated costs.
//!
//! Pipeline position:
//! 1. Logical Planning (upstream): SQL → nested [`logical::PlanNode`]
//! 2. Lowering: `PlanNode` → [`logical::RaTree`] arena
//! 3. Cost Estimation: `RaTree` + [`TableStats`](crate::metadata::TableStats) → [`cost::CostAnnotations`]
//! 4. Rendering / comparison of the annotated plans

pub mod cost;
pub mod logical;
pub mod render;

use crate::planner::logical::NodeId;
use thiserror::Error;

/// Errors that can occur while costing or rendering a plan.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("Node {0} is not part of the plan")]
    UnknownNode(NodeId),

    #[error("Plan is deeper than the configured limit of {limit} operators")]
    DepthLimitExceeded { limit: usize },

    #[error("Invalid cost model: {0}")]
    InvalidCostModel(String),
}

pub type PlanResult<T> = Result<T, PlanError>;
