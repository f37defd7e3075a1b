//! Removal-only repair of infeasible selections.
//!
//! Both policies deselect one project at a time until every resource fits.
//! Each step removes a selected project, so consumption never grows and the
//! loop ends after at most `n_projects` removals: the empty selection fits any
//! instance because capacities are non-negative.

use tracing::{debug, trace};

use crate::problem::Instance;
use crate::selection::{Selection, fits};
use crate::surrogate::RankOrder;

/// Projects removed by a repair, in removal order
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairTrace {
    pub removed: Vec<usize>,
}

impl RepairTrace {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removed.len()
    }
}

/// Restores feasibility of a selection in place
pub trait Repair {
    /// `order` is the ranking the selection was built from, best first.
    fn repair(&self, instance: &Instance, selection: &mut Selection, order: &RankOrder) -> RepairTrace;

    fn name(&self) -> &'static str;
}

/// Repeatedly drop the selected project with the lowest profit per unit of
/// total footprint, recomputed over the current selection.
///
/// Ties go to the lowest index. Zero-footprint projects count as ratio 0 and
/// are therefore dropped first. Worst case O(n²·m).
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstRatioRepair;

impl Repair for WorstRatioRepair {
    fn repair(&self, instance: &Instance, selection: &mut Selection, _order: &RankOrder) -> RepairTrace {
        let mut consumption = selection.consumption(instance);
        let mut trace = RepairTrace::default();

        while !fits(&consumption, instance.capacities()) {
            // min_by keeps the first of equal elements, i.e. the lowest index
            let worst = selection
                .selected()
                .map(|j| (j, instance.ratio(j)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let Some((project, ratio)) = worst else {
                break;
            };
            trace!(project, ratio, "removing worst live ratio");
            remove(instance, selection, &mut consumption, project, &mut trace);
        }

        debug!(policy = self.name(), removed = trace.len(), "repair finished");
        trace
    }

    fn name(&self) -> &'static str {
        "worst-ratio"
    }
}

/// Walk the construction ranking from its worst end and drop each project
/// that is still selected until the selection fits.
///
/// The ranking is visited once, so the cost after sorting is O(n·m). Among
/// equal ratios the highest index goes first, the reverse of
/// [`WorstRatioRepair`]. Selected projects missing from the ranking are
/// dropped afterwards in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseRankRepair;

impl Repair for ReverseRankRepair {
    fn repair(&self, instance: &Instance, selection: &mut Selection, order: &RankOrder) -> RepairTrace {
        let mut consumption = selection.consumption(instance);
        let mut trace = RepairTrace::default();
        let mut candidates = order
            .worst_first()
            .filter(|&j| j < instance.num_projects())
            .chain(0..instance.num_projects());

        while !fits(&consumption, instance.capacities()) {
            let Some(project) = candidates.find(|&j| selection.is_selected(j)) else {
                break;
            };
            trace!(project, "removing by reverse rank");
            remove(instance, selection, &mut consumption, project, &mut trace);
        }

        debug!(policy = self.name(), removed = trace.len(), "repair finished");
        trace
    }

    fn name(&self) -> &'static str {
        "reverse-rank"
    }
}

fn remove(
    instance: &Instance,
    selection: &mut Selection,
    consumption: &mut [u64],
    project: usize,
    trace: &mut RepairTrace,
) {
    if selection.deselect(project) {
        for (used, w) in consumption.iter_mut().zip(instance.column(project)) {
            *used -= w;
        }
        trace.removed.push(project);
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepairPolicy {
    /// Recompute the worst live ratio before every removal
    #[default]
    WorstRatio,
    /// Scan the fixed ranking backwards
    ReverseRank,
}

impl RepairPolicy {
    pub fn build(self) -> Box<dyn Repair> {
        match self {
            RepairPolicy::WorstRatio => Box::new(WorstRatioRepair),
            RepairPolicy::ReverseRank => Box::new(ReverseRankRepair),
        }
    }
}

impl std::str::FromStr for RepairPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "worst-ratio" => Ok(Self::WorstRatio),
            "reverse-rank" => Ok(Self::ReverseRank),
            other => Err(format!("unknown repair policy '{}'", other)),
        }
    }
}
