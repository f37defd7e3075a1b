use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::problem::Instance;
use crate::selection::Selection;
use crate::surrogate::{RankOrder, Surrogate};

/// Produces an initial selection for an instance
pub trait Construct {
    fn construct(&mut self, instance: &Instance, surrogate: &Surrogate, order: &RankOrder) -> Selection;

    /// When true the result already respects every capacity and repair is skipped
    fn feasible_by_construction(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

/// Walk projects best ratio first and keep those that fit the surrogate capacity.
///
/// Only the aggregate capacity is checked, so the result can overflow a single
/// resource and must be repaired.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioFill;

impl Construct for RatioFill {
    fn construct(&mut self, instance: &Instance, surrogate: &Surrogate, order: &RankOrder) -> Selection {
        let mut selection = Selection::empty(instance.num_projects());
        let mut remaining = surrogate.capacity;
        for j in order.iter() {
            let weight = surrogate.weights[j];
            if remaining >= weight {
                selection.select(j);
                remaining -= weight;
            }
        }
        selection
    }

    fn name(&self) -> &'static str {
        "ratio"
    }
}

/// Walk a random permutation and keep every project that fits all resources.
pub struct RandomFill<R = StdRng> {
    rng: R,
}

impl RandomFill<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomFill<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Construct for RandomFill<R> {
    fn construct(&mut self, instance: &Instance, _surrogate: &Surrogate, _order: &RankOrder) -> Selection {
        let mut permutation: Vec<usize> = (0..instance.num_projects()).collect();
        permutation.shuffle(&mut self.rng);

        let capacities = instance.capacities();
        let mut consumption = vec![0u64; instance.num_resources()];
        let mut selection = Selection::empty(instance.num_projects());
        for j in permutation {
            let fits = instance
                .column(j)
                .zip(&consumption)
                .zip(capacities)
                .all(|((w, used), cap)| used + w <= *cap);
            if fits {
                selection.select(j);
                for (used, w) in consumption.iter_mut().zip(instance.column(j)) {
                    *used += w;
                }
            }
        }
        selection
    }

    fn feasible_by_construction(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Start with every project selected and leave the rest to repair
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAll;

impl Construct for SelectAll {
    fn construct(&mut self, instance: &Instance, _surrogate: &Surrogate, _order: &RankOrder) -> Selection {
        Selection::full(instance.num_projects())
    }

    fn name(&self) -> &'static str {
        "all"
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructionStrategy {
    /// Surrogate-feasible fill in ratio order
    #[default]
    Ratio,
    /// Fully constrained fill in seeded random order
    Random,
    /// Every project selected
    All,
}

impl ConstructionStrategy {
    pub fn build(self, seed: u64) -> Box<dyn Construct> {
        match self {
            ConstructionStrategy::Ratio => Box::new(RatioFill),
            ConstructionStrategy::Random => Box::new(RandomFill::seeded(seed)),
            ConstructionStrategy::All => Box::new(SelectAll),
        }
    }
}

impl std::str::FromStr for ConstructionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ratio" => Ok(Self::Ratio),
            "random" => Ok(Self::Random),
            "all" => Ok(Self::All),
            other => Err(format!("unknown construction strategy '{}'", other)),
        }
    }
}
