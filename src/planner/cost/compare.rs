//! Comparing the estimated cost of two plans for the same query.

use serde::Serialize;
use std::fmt;

use super::estimator::CostAnnotations;

/// Relative difference under which two plans are reported as equally costly.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// How a candidate plan's cumulative cost relates to a baseline's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostComparison {
    Lower,
    Higher,
    Similar,
}

impl fmt::Display for CostComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CostComparison::Lower => "candidate plan has a lower cumulative cost",
            CostComparison::Higher => "candidate plan has a higher cumulative cost",
            CostComparison::Similar => "both plans have almost the same cumulative cost",
        };
        f.write_str(msg)
    }
}

/// Compare two cumulative costs, treating differences within `tolerance`
/// (relative) as equal.
pub fn compare_costs(baseline: f64, candidate: f64, tolerance: f64) -> CostComparison {
    let margin = 1.0 + tolerance;
    if baseline > candidate * margin {
        CostComparison::Lower
    } else if baseline * margin < candidate {
        CostComparison::Higher
    } else {
        CostComparison::Similar
    }
}

/// Compare the root cumulative costs of two estimated plans.
pub fn compare_plans(
    baseline: &CostAnnotations,
    candidate: &CostAnnotations,
    tolerance: f64,
) -> CostComparison {
    compare_costs(baseline.total_cost(), candidate.total_cost(), tolerance)
}
