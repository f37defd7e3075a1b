//! Surrogate relaxation.
//!
//! All resource constraints are summed into a single aggregate constraint. The
//! result is only a ranking device: a selection that respects the surrogate
//! capacity can still overflow an individual resource, so anything built from
//! it has to be checked against the real capacities afterwards.

use crate::problem::Instance;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Surrogate {
    /// Sum of each project's consumption over all resources
    pub weights: Vec<u64>,
    /// Sum of all resource capacities
    pub capacity: u64,
    /// Profit per unit of surrogate weight, 0 for zero-footprint projects
    pub ratios: Vec<f64>,
}

impl Surrogate {
    pub fn relax(instance: &Instance) -> Self {
        let weights: Vec<u64> = (0..instance.num_projects())
            .map(|j| instance.footprint(j))
            .collect();
        let ratios = (0..instance.num_projects()).map(|j| instance.ratio(j)).collect();
        Self {
            weights,
            capacity: instance.capacities().iter().sum(),
            ratios,
        }
    }

    pub fn ratio(&self, project: usize) -> f64 {
        self.ratios[project]
    }

    /// Project indices ordered best ratio first.
    pub fn rank_order(&self) -> RankOrder {
        RankOrder::by_descending(&self.ratios)
    }
}

/// A permutation of project indices, best first.
///
/// Ties keep ascending index order so the ranking is deterministic.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOrder(Vec<usize>);

impl RankOrder {
    pub fn by_descending(scores: &[f64]) -> Self {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        // Stable sort, so equal scores stay in index order
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        Self(order)
    }

    /// Wrap an explicit best-first ordering
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Best to worst
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Worst to best
    pub fn worst_first(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relax_sums_dimensions() {
        let instance = Instance::new(
            3,
            2,
            0.0,
            vec![10.0, 20.0, 15.0],
            vec![vec![2, 3, 4], vec![1, 0, 2]],
            vec![5, 3],
        )
        .unwrap();
        let surrogate = Surrogate::relax(&instance);
        assert_eq!(surrogate.weights, vec![3, 3, 6]);
        assert_eq!(surrogate.capacity, 8);
        assert!((surrogate.ratio(2) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_rank_order_descending() {
        let instance = Instance::new(3, 1, 0.0, vec![10.0, 20.0, 15.0], vec![vec![2, 3, 4]], vec![5]).unwrap();
        let order = Surrogate::relax(&instance).rank_order();
        assert_eq!(order.as_slice(), &[1, 0, 2]);
        assert_eq!(order.worst_first().collect::<Vec<_>>(), vec![2, 0, 1]);
    }

    #[test]
    fn test_rank_order_ties_by_index() {
        let order = RankOrder::by_descending(&[1.0, 2.0, 1.0, 2.0, 0.0]);
        assert_eq!(order.as_slice(), &[1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_zero_footprint_ranks_last() {
        let instance = Instance::new(3, 1, 0.0, vec![100.0, 1.0, 0.5], vec![vec![0, 10, 1]], vec![5]).unwrap();
        let order = Surrogate::relax(&instance).rank_order();
        assert_eq!(order.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn test_surrogate_fit_does_not_imply_feasibility() {
        // Both projects fit the aggregate capacity (4 <= 4) but overflow resource 0
        let instance = Instance::new(2, 2, 0.0, vec![1.0, 1.0], vec![vec![2, 2], vec![0, 0]], vec![3, 1]).unwrap();
        let surrogate = Surrogate::relax(&instance);
        assert!(surrogate.weights.iter().sum::<u64>() <= surrogate.capacity);
        assert!(!crate::Selection::full(2).is_feasible(&instance));
    }
}
