//! Logical plans - relational-algebra trees handed over by the upstream planner.

mod builder;
mod plan;

pub use builder::PlanNode;
pub use plan::*;
