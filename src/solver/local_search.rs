use std::cmp::Reverse;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::solver::{
    graph::{ConstraintGraph, LabelId, LabelSet, VariableId},
    heuristics::stop::StopCondition,
};

/// Default wall-clock budget for a local-search run.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// A total labelling mutated in place by hill-climbing moves.
///
/// Unlike the backtracking solver's domain store there is no partial state:
/// every variable always holds exactly one label, and search moves swap
/// labels rather than prune candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Colouring {
    labels: Vec<LabelId>,
}

impl Colouring {
    /// Assigns every variable an independent, uniformly random label.
    pub fn random<R: Rng + ?Sized>(
        variable_count: usize,
        labels: &LabelSet,
        rng: &mut R,
    ) -> Self {
        let k = labels.len() as LabelId;
        Self {
            labels: (0..variable_count).map(|_| rng.gen_range(0..k)).collect(),
        }
    }

    pub fn get(&self, v: VariableId) -> LabelId {
        self.labels[v as usize]
    }

    pub fn set(&mut self, v: VariableId, label: LabelId) {
        self.labels[v as usize] = label;
    }

    pub fn variable_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[LabelId] {
        &self.labels
    }

    /// Number of neighbors of `v` currently sharing `v`'s label.
    pub fn conflicts(&self, graph: &ConstraintGraph, v: VariableId) -> usize {
        let label = self.get(v);
        graph
            .neighbors(v)
            .iter()
            .filter(|&&z| self.get(z) == label)
            .count()
    }

    /// Sum of [`Self::conflicts`] over all variables; each conflicting edge
    /// counts once per endpoint. Zero iff the colouring is proper.
    pub fn total_conflicts(&self, graph: &ConstraintGraph) -> usize {
        graph.variables().map(|v| self.conflicts(graph, v)).sum()
    }
}

/// Progress counters, passed to the [`StopCondition`] and attached to the
/// report. `restarts` counts fresh random assignments, the initial one
/// included.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LocalSearchStats {
    pub improving_moves: u64,
    pub restarts: u64,
}

/// Outcome of a local-search run. `colouring` is present iff the objective
/// reached zero before the stop condition fired; a missing colouring carries
/// no verdict on solvability.
#[derive(Debug, Clone, Serialize)]
pub struct LocalSearchReport {
    pub colouring: Option<Colouring>,
    pub improving_moves: u64,
    pub restarts: u64,
}

impl LocalSearchReport {
    pub fn solved(&self) -> bool {
        self.colouring.is_some()
    }

    fn from_stats(colouring: Option<Colouring>, stats: LocalSearchStats) -> Self {
        Self {
            colouring,
            improving_moves: stats.improving_moves,
            restarts: stats.restarts,
        }
    }
}

/// Conflict-minimising hill-climbing with random restarts.
///
/// Each attempt starts from a fresh random [`Colouring`] and a uniformly
/// random first variable; while moves strictly improve, the next variable is
/// the currently most-conflicted one. A step that cannot improve (a plateau
/// or local optimum) with conflicts still present discards the state and
/// restarts. The stop condition is consulted once per restart and once per
/// step, so a run overshoots its budget by at most one step.
pub struct LocalSearchSolver;

impl LocalSearchSolver {
    pub fn new() -> Self {
        Self
    }

    pub fn solve<R: Rng + ?Sized>(
        &self,
        graph: &ConstraintGraph,
        labels: &LabelSet,
        rng: &mut R,
        stop: &mut dyn StopCondition,
    ) -> LocalSearchReport {
        let n = graph.variable_count();
        let mut stats = LocalSearchStats::default();
        if n == 0 {
            return LocalSearchReport::from_stats(Some(Colouring { labels: Vec::new() }), stats);
        }
        if labels.is_empty() {
            // No labels to assign: nothing to search.
            return LocalSearchReport::from_stats(None, stats);
        }

        loop {
            if stop.should_stop(&stats) {
                debug!(
                    restarts = stats.restarts,
                    "local search stopped without a solution"
                );
                return LocalSearchReport::from_stats(None, stats);
            }

            let mut state = Colouring::random(n, labels, rng);
            stats.restarts += 1;
            let mut var = rng.gen_range(0..n) as VariableId;

            while hill_climb(graph, labels, &mut state, var) {
                stats.improving_moves += 1;
                if state.total_conflicts(graph) == 0 {
                    break;
                }
                if stop.should_stop(&stats) {
                    return LocalSearchReport::from_stats(None, stats);
                }
                var = most_conflicted(graph, &state);
            }

            if state.total_conflicts(graph) == 0 {
                debug!(
                    restarts = stats.restarts,
                    moves = stats.improving_moves,
                    "local search found a proper colouring"
                );
                return LocalSearchReport::from_stats(Some(state), stats);
            }
            // Local optimum with conflicts left: fall through to a restart.
        }
    }
}

impl Default for LocalSearchSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Tries the strict-improvement move for `var`: among all other labels,
/// compute the conflict count `var` would have and keep the first label (in
/// label order) achieving the minimum, but only if that minimum is strictly
/// below the current conflict count. Returns whether a move was made.
fn hill_climb(
    graph: &ConstraintGraph,
    labels: &LabelSet,
    state: &mut Colouring,
    var: VariableId,
) -> bool {
    let current = state.get(var);
    let mut best = current;
    let mut best_conflicts = state.conflicts(graph, var);
    for label in labels.ids() {
        if label == current {
            continue;
        }
        let conflicts = graph
            .neighbors(var)
            .iter()
            .filter(|&&z| state.get(z) == label)
            .count();
        if conflicts < best_conflicts {
            best = label;
            best_conflicts = conflicts;
        }
    }
    if best == current {
        return false;
    }
    state.set(var, best);
    true
}

/// The variable with the most conflicts; ties go to the lowest id.
fn most_conflicted(graph: &ConstraintGraph, state: &Colouring) -> VariableId {
    graph
        .variables()
        .min_by_key(|&v| (Reverse(state.conflicts(graph, v)), v))
        .expect("graph has at least one variable")
}
