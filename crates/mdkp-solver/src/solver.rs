use std::time::Instant;

use tracing::debug;

use crate::construct::{Construct, ConstructionStrategy};
use crate::problem::Instance;
use crate::repair::{Repair, RepairPolicy, RepairTrace};
use crate::solution::{SolveResult, evaluate};
use crate::surrogate::Surrogate;

/// Which heuristics a [`Solver`] runs
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverOptions {
    pub construction: ConstructionStrategy,
    pub repair: RepairPolicy,
    /// Seed for randomized construction
    pub seed: u64,
}

impl SolverOptions {
    pub fn with_construction(mut self, construction: ConstructionStrategy) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_repair(mut self, repair: RepairPolicy) -> Self {
        self.repair = repair;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Construct-then-repair pipeline for MDKP instances
pub struct Solver {
    options: SolverOptions,
    constructor: Box<dyn Construct>,
    repairer: Box<dyn Repair>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::with_options(SolverOptions::default())
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SolverOptions) -> Self {
        Self {
            options,
            constructor: options.construction.build(options.seed),
            repairer: options.repair.build(),
        }
    }

    /// Replaces the constructor, keeping any injected repairer
    pub fn with_construction(mut self, construction: ConstructionStrategy) -> Self {
        self.options = self.options.with_construction(construction);
        self.constructor = construction.build(self.options.seed);
        self
    }

    /// Replaces the repairer, keeping any injected constructor
    pub fn with_repair(mut self, repair: RepairPolicy) -> Self {
        self.options = self.options.with_repair(repair);
        self.repairer = repair.build();
        self
    }

    /// Rebuilds the constructor from the configured strategy, restarting its
    /// random stream. An injected constructor is replaced.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options = self.options.with_seed(seed);
        self.constructor = self.options.construction.build(seed);
        self
    }

    /// Use a custom constructor, e.g. a [`crate::RandomFill`] over another RNG
    pub fn with_constructor(mut self, constructor: Box<dyn Construct>) -> Self {
        self.constructor = constructor;
        self
    }

    pub fn with_repairer(mut self, repairer: Box<dyn Repair>) -> Self {
        self.repairer = repairer;
        self
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Build, repair and score a selection for one instance.
    pub fn solve(&mut self, instance: &Instance) -> SolveResult {
        let start = Instant::now();

        let surrogate = Surrogate::relax(instance);
        let order = surrogate.rank_order();
        let mut selection = self.constructor.construct(instance, &surrogate, &order);

        let trace = if self.constructor.feasible_by_construction() {
            debug_assert!(selection.is_feasible(instance));
            RepairTrace::default()
        } else {
            self.repairer.repair(instance, &mut selection, &order)
        };

        let elapsed = start.elapsed();
        let result = evaluate(instance, selection, elapsed, trace.len());

        debug!(
            projects = instance.num_projects(),
            resources = instance.num_resources(),
            construction = self.constructor.name(),
            repair = self.repairer.name(),
            removed = result.removed,
            value = result.majorant_value,
            gap = result.gap,
            elapsed_us = elapsed.as_micros() as u64,
            "solved instance"
        );
        result
    }

    /// Solve instances one after another, in order.
    pub fn solve_all(&mut self, instances: &[Instance]) -> Vec<SolveResult> {
        instances.iter().map(|instance| self.solve(instance)).collect()
    }
}
