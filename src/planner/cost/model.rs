//! Heuristic cost formulas.

use crate::planner::{PlanError, PlanResult};

/// Row count assumed for tables the catalog knows nothing about.
pub const DEFAULT_ROW_COUNT: u64 = 100_000;
/// Fraction of input rows a filter keeps, whatever the predicate.
pub const DEFAULT_SELECTIVITY: f64 = 0.1;
pub const DEFAULT_MIN_SELECTION_COST: f64 = 1.0;
/// Reduction applied to the cross product of the join inputs.
pub const DEFAULT_JOIN_FACTOR: f64 = 0.01;
pub const DEFAULT_MIN_JOIN_COST: f64 = 50.0;
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Constants driving the per-operator cost rules.
///
/// | Operator   | cost                                              |
/// |------------|---------------------------------------------------|
/// | Relation   | row count, or `default_row_count`                 |
/// | Selection  | `max(min_selection_cost, child * selectivity)`    |
/// | Projection | child                                             |
/// | Join       | `max(min_join_cost, left * right * join_factor)`  |
/// | Subquery   | child                                             |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub default_row_count: u64,
    pub selectivity: f64,
    pub min_selection_cost: f64,
    pub join_factor: f64,
    pub min_join_cost: f64,
    /// Deepest operator chain the estimator will descend into.
    pub max_depth: usize,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            default_row_count: DEFAULT_ROW_COUNT,
            selectivity: DEFAULT_SELECTIVITY,
            min_selection_cost: DEFAULT_MIN_SELECTION_COST,
            join_factor: DEFAULT_JOIN_FACTOR,
            min_join_cost: DEFAULT_MIN_JOIN_COST,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CostModel {
    /// Check that every constant keeps costs finite and non-negative.
    pub fn validate(self) -> PlanResult<Self> {
        let factors = [
            ("selectivity", self.selectivity),
            ("min_selection_cost", self.min_selection_cost),
            ("join_factor", self.join_factor),
            ("min_join_cost", self.min_join_cost),
        ];

        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidCostModel(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }

        if self.max_depth == 0 {
            return Err(PlanError::InvalidCostModel(
                "max_depth must be at least 1".to_string(),
            ));
        }

        Ok(self)
    }

    pub fn relation_cost(&self, row_count: Option<u64>) -> f64 {
        row_count.unwrap_or(self.default_row_count) as f64
    }

    pub fn selection_cost(&self, child_cost: f64) -> f64 {
        (child_cost * self.selectivity).max(self.min_selection_cost)
    }

    pub fn join_cost(&self, left_cost: f64, right_cost: f64) -> f64 {
        (left_cost * right_cost * self.join_factor).max(self.min_join_cost)
    }
}
