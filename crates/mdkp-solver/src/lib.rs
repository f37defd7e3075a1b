mod construct;
mod problem;
mod repair;
mod selection;
mod solution;
mod solver;
mod surrogate;

#[cfg(test)]
mod testing;

pub use construct::{Construct, ConstructionStrategy, RandomFill, RatioFill, SelectAll};
pub use problem::{Instance, InstanceError};
pub use repair::{Repair, RepairPolicy, RepairTrace, ReverseRankRepair, WorstRatioRepair};
pub use selection::{ResourceViolation, Selection};
pub use solution::{SolveResult, Summary, evaluate};
pub use solver::{Solver, SolverOptions};
pub use surrogate::{RankOrder, Surrogate};
