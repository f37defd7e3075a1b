use std::time::Duration;

use crate::problem::Instance;
use crate::selection::Selection;

/// The outcome of solving one instance
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub selection: Selection,
    /// Total profit of the selection
    pub majorant_value: f64,
    /// Absolute distance to the instance's reference optimum. This is a
    /// heuristic distance, not a proven bound.
    pub gap: f64,
    /// Wall-clock time of construction and repair, parsing excluded
    pub resolution_time: Duration,
    /// Number of projects dropped by repair
    pub removed: usize,
    pub feasible: bool,
}

/// Score a finished selection against its instance.
pub fn evaluate(instance: &Instance, selection: Selection, resolution_time: Duration, removed: usize) -> SolveResult {
    let majorant_value = selection.profit(instance);
    SolveResult {
        gap: (instance.optimal_value() - majorant_value).abs(),
        feasible: selection.is_feasible(instance),
        selection,
        majorant_value,
        resolution_time,
        removed,
    }
}

/// Aggregate figures over a batch of results
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub instances: usize,
    pub total_value: f64,
    pub total_gap: f64,
    pub mean_gap: f64,
    pub total_time: Duration,
}

impl Summary {
    pub fn from_results(results: &[SolveResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let total_gap: f64 = results.iter().map(|r| r.gap).sum();
        Self {
            instances: results.len(),
            total_value: results.iter().map(|r| r.majorant_value).sum(),
            total_gap,
            mean_gap: total_gap / results.len() as f64,
            total_time: results.iter().map(|r| r.resolution_time).sum(),
        }
    }
}
