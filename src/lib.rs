//! Tinct solves graph-colouring constraint problems: variables joined by
//! "must differ" edges must each take one label from a shared label set.
//!
//! Two independent solvers share an immutable [`ConstraintGraph`]:
//!
//! - [`run_backtracking`]: systematic depth-first search with forward
//!   checking and AC-3 propagation ([`solver::propagation`]) after every
//!   tentative assignment. Complete: an exhausted search proves there is no
//!   solution.
//! - [`run_local_search`]: conflict-minimising hill-climbing over total
//!   random assignments, with random restarts and a wall-clock deadline.
//!   Incomplete but often quick on satisfiable instances.
//!
//! # Example
//!
//! ```
//! use tinct::solver::graph::{ConstraintGraph, LabelSet};
//!
//! // A triangle needs three colours.
//! let labels = LabelSet::from_names(["red", "green", "blue"]).unwrap();
//! let mut builder = ConstraintGraph::builder(3);
//! builder.add_edge(0, 1).unwrap();
//! builder.add_edge(1, 2).unwrap();
//! builder.add_edge(0, 2).unwrap();
//! let graph = builder.build();
//!
//! let report = tinct::run_backtracking(&graph, &labels, 0);
//! let assignment = report.assignment.expect("a triangle is 3-colourable");
//! assert!(assignment.is_valid(&graph));
//! assert_eq!(report.attempts, 3);
//! ```

pub mod error;
pub mod parse;
pub mod solver;

use std::time::Duration;

use rand_core::SeedableRng;

pub use crate::error::{Error, Result};
use crate::solver::{
    backtracking::{BacktrackReport, BacktrackingSolver},
    graph::{ConstraintGraph, LabelSet, VariableId},
    heuristics::stop::WallClockDeadline,
    local_search::{LocalSearchReport, LocalSearchSolver},
};

/// Runs the backtracking solver with its default variable ordering
/// ([`solver::heuristics::variable::AdjacentFirst`]), branching on `start`
/// first.
pub fn run_backtracking(
    graph: &ConstraintGraph,
    labels: &LabelSet,
    start: VariableId,
) -> BacktrackReport {
    BacktrackingSolver::new().solve(graph, labels, start)
}

/// Runs the local search under a wall-clock `deadline`, drawing randomness
/// from a `ChaCha8` generator seeded with `seed` so runs are reproducible.
pub fn run_local_search(
    graph: &ConstraintGraph,
    labels: &LabelSet,
    deadline: Duration,
    seed: u64,
) -> LocalSearchReport {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let mut stop = WallClockDeadline::after(deadline);
    LocalSearchSolver::new().solve(graph, labels, &mut rng, &mut stop)
}
