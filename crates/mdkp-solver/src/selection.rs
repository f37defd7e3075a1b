use crate::problem::Instance;

/// Binary inclusion vector over the projects of one instance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    included: Vec<bool>,
}

/// A resource whose capacity is exceeded by a selection
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceViolation {
    pub resource: usize,
    pub capacity: u64,
    pub consumption: u64,
    /// How far consumption exceeds capacity
    pub excess: u64,
}

impl Selection {
    /// The all-zero selection, feasible for every instance
    pub fn empty(n_projects: usize) -> Self {
        Self {
            included: vec![false; n_projects],
        }
    }

    pub fn full(n_projects: usize) -> Self {
        Self {
            included: vec![true; n_projects],
        }
    }

    pub fn from_bits(bits: &[u8]) -> Self {
        Self {
            included: bits.iter().map(|&b| b != 0).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.included.len()
    }

    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }

    pub fn is_selected(&self, project: usize) -> bool {
        self.included[project]
    }

    pub fn select(&mut self, project: usize) {
        self.included[project] = true;
    }

    /// Returns whether the project was selected before the call
    pub fn deselect(&mut self, project: usize) -> bool {
        std::mem::replace(&mut self.included[project], false)
    }

    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.included
            .iter()
            .enumerate()
            .filter_map(|(j, &inc)| inc.then_some(j))
    }

    pub fn count(&self) -> usize {
        self.included.iter().filter(|&&inc| inc).count()
    }

    /// The selection as 0/1 values, in project order
    pub fn to_bits(&self) -> Vec<u8> {
        self.included.iter().map(|&inc| u8::from(inc)).collect()
    }

    /// Per-resource consumption of the selected projects.
    pub fn consumption(&self, instance: &Instance) -> Vec<u64> {
        instance
            .weights()
            .iter()
            .map(|row| self.selected().map(|j| row[j]).sum())
            .collect()
    }

    pub fn profit(&self, instance: &Instance) -> f64 {
        self.selected().map(|j| instance.profit(j)).sum()
    }

    pub fn is_feasible(&self, instance: &Instance) -> bool {
        fits(&self.consumption(instance), instance.capacities())
    }

    pub fn violations(&self, instance: &Instance) -> Vec<ResourceViolation> {
        self.consumption(instance)
            .into_iter()
            .zip(instance.capacities())
            .enumerate()
            .filter(|(_, (used, cap))| used > *cap)
            .map(|(resource, (consumption, &capacity))| ResourceViolation {
                resource,
                capacity,
                consumption,
                excess: consumption - capacity,
            })
            .collect()
    }
}

/// Whether every consumption entry is within its capacity
pub(crate) fn fits(consumption: &[u64], capacities: &[u64]) -> bool {
    consumption.iter().zip(capacities).all(|(used, cap)| used <= cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance::new(
            3,
            2,
            0.0,
            vec![6.0, 5.0, 8.0],
            vec![vec![5, 4, 7], vec![1, 1, 1]],
            vec![8, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_consumption_and_profit() {
        let instance = instance();
        let selection = Selection::from_bits(&[1, 0, 1]);
        assert_eq!(selection.consumption(&instance), vec![12, 2]);
        assert_eq!(selection.profit(&instance), 14.0);
        assert_eq!(selection.count(), 2);
        assert_eq!(selection.selected().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_violations() {
        let instance = instance();
        let selection = Selection::full(3);
        assert!(!selection.is_feasible(&instance));
        assert_eq!(
            selection.violations(&instance),
            vec![ResourceViolation {
                resource: 0,
                capacity: 8,
                consumption: 16,
                excess: 8,
            }]
        );
    }

    #[test]
    fn test_empty_selection_is_feasible() {
        let instance = instance();
        let selection = Selection::empty(3);
        assert!(selection.is_feasible(&instance));
        assert_eq!(selection.consumption(&instance), vec![0, 0]);
        assert_eq!(selection.profit(&instance), 0.0);

        let zero_capacity = Instance::new(2, 1, 0.0, vec![1.0, 1.0], vec![vec![3, 0]], vec![0]).unwrap();
        assert!(Selection::empty(2).is_feasible(&zero_capacity));
    }

    #[test]
    fn test_deselect_reports_previous_state() {
        let mut selection = Selection::from_bits(&[1, 0]);
        assert!(selection.deselect(0));
        assert!(!selection.deselect(0));
        assert!(!selection.deselect(1));
        assert_eq!(selection.to_bits(), vec![0, 0]);
    }
}
