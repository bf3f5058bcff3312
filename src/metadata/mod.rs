//! Catalog metadata consumed by the cost estimator.
//!
//! Statistics are collected elsewhere; this module only holds and loads them.

mod stats;

pub use stats::{StatsError, TableStats};
