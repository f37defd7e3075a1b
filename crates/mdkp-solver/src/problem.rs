use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstanceError {
    #[error("Instance must have at least one project")]
    NoProjects,
    #[error("Instance must have at least one resource")]
    NoResources,
    #[error("Expected {expected} profits, found {found}")]
    ProfitCount { expected: usize, found: usize },
    #[error("Expected {expected} resource rows, found {found}")]
    ResourceCount { expected: usize, found: usize },
    #[error("Resource row {row} has {found} entries, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Expected {expected} capacities, found {found}")]
    CapacityCount { expected: usize, found: usize },
    #[error("Profit of project {project} must be a non-negative number, found {value}")]
    InvalidProfit { project: usize, value: f64 },
    #[error("Optimal value must be finite, found {0}")]
    InvalidOptimum(f64),
    #[error("Sum of all capacities does not fit in 64 bits")]
    CapacityOverflow,
    #[error("Sum of all resource weights does not fit in 64 bits")]
    WeightOverflow,
}

fn checked_total<'a>(values: impl IntoIterator<Item = &'a u64>) -> Option<u64> {
    values.into_iter().try_fold(0u64, |acc, &v| acc.checked_add(v))
}

/// A multidimensional knapsack instance.
///
/// `weights[i][j]` is the consumption of resource `i` by project `j`. The
/// instance is validated once in [`Instance::new`] and never mutated after.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    n_projects: usize,
    m_resources: usize,
    /// Reference optimum supplied with the benchmark, not computed here
    optimal_value: f64,
    profits: Vec<f64>,
    weights: Vec<Vec<u64>>,
    capacities: Vec<u64>,
}

impl Instance {
    pub fn new(
        n_projects: usize,
        m_resources: usize,
        optimal_value: f64,
        profits: Vec<f64>,
        weights: Vec<Vec<u64>>,
        capacities: Vec<u64>,
    ) -> Result<Self, InstanceError> {
        if n_projects == 0 {
            return Err(InstanceError::NoProjects);
        }
        if m_resources == 0 {
            return Err(InstanceError::NoResources);
        }
        if !optimal_value.is_finite() {
            return Err(InstanceError::InvalidOptimum(optimal_value));
        }
        if profits.len() != n_projects {
            return Err(InstanceError::ProfitCount {
                expected: n_projects,
                found: profits.len(),
            });
        }
        if let Some((project, &value)) = profits
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(InstanceError::InvalidProfit { project, value });
        }
        if weights.len() != m_resources {
            return Err(InstanceError::ResourceCount {
                expected: m_resources,
                found: weights.len(),
            });
        }
        if let Some((row, r)) = weights.iter().enumerate().find(|(_, r)| r.len() != n_projects) {
            return Err(InstanceError::RowLength {
                row,
                expected: n_projects,
                found: r.len(),
            });
        }
        if capacities.len() != m_resources {
            return Err(InstanceError::CapacityCount {
                expected: m_resources,
                found: capacities.len(),
            });
        }

        // Bounding the grand totals keeps every footprint, consumption and
        // surrogate sum below u64::MAX
        if checked_total(&capacities).is_none() {
            return Err(InstanceError::CapacityOverflow);
        }
        if checked_total(weights.iter().flatten()).is_none() {
            return Err(InstanceError::WeightOverflow);
        }

        Ok(Self {
            n_projects,
            m_resources,
            optimal_value,
            profits,
            weights,
            capacities,
        })
    }

    pub fn num_projects(&self) -> usize {
        self.n_projects
    }

    pub fn num_resources(&self) -> usize {
        self.m_resources
    }

    pub fn optimal_value(&self) -> f64 {
        self.optimal_value
    }

    pub fn profits(&self) -> &[f64] {
        &self.profits
    }

    pub fn profit(&self, project: usize) -> f64 {
        self.profits[project]
    }

    /// Row-major resource matrix, one row per resource
    pub fn weights(&self) -> &[Vec<u64>] {
        &self.weights
    }

    pub fn weight(&self, resource: usize, project: usize) -> u64 {
        self.weights[resource][project]
    }

    pub fn capacities(&self) -> &[u64] {
        &self.capacities
    }

    /// Consumption of every resource by a single project
    pub fn column(&self, project: usize) -> impl Iterator<Item = u64> + '_ {
        self.weights.iter().map(move |row| row[project])
    }

    /// Sum of a project's consumption across all resources.
    pub fn footprint(&self, project: usize) -> u64 {
        self.column(project).sum()
    }

    /// Profit per unit of total footprint.
    ///
    /// A project that consumes nothing gets ratio 0, which ranks it as the
    /// worst candidate even though it is free.
    pub fn ratio(&self, project: usize) -> f64 {
        match self.footprint(project) {
            0 => 0.0,
            footprint => self.profits[project] / footprint as f64,
        }
    }

    /// Projects whose footprint is zero in every dimension
    pub fn zero_footprint_projects(&self) -> Vec<usize> {
        (0..self.n_projects).filter(|&j| self.footprint(j) == 0).collect()
    }
}
