use serde::Serialize;
use tracing::debug;

use crate::solver::{
    domain::{DomainSnapshot, DomainStore},
    graph::{ConstraintGraph, LabelId, LabelSet, VariableId},
    heuristics::variable::{AdjacentFirst, VariableOrdering},
    propagation,
};

/// A partial or complete labelling of the variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    values: Vec<Option<LabelId>>,
    assigned: usize,
}

impl Assignment {
    pub fn empty(variable_count: usize) -> Self {
        Self {
            values: vec![None; variable_count],
            assigned: 0,
        }
    }

    pub fn get(&self, v: VariableId) -> Option<LabelId> {
        self.values[v as usize]
    }

    pub fn is_assigned(&self, v: VariableId) -> bool {
        self.values[v as usize].is_some()
    }

    pub fn set(&mut self, v: VariableId, label: LabelId) {
        if self.values[v as usize].replace(label).is_none() {
            self.assigned += 1;
        }
    }

    pub fn clear(&mut self, v: VariableId) {
        if self.values[v as usize].take().is_some() {
            self.assigned -= 1;
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.assigned
    }

    pub fn variable_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_complete(&self) -> bool {
        self.assigned == self.values.len()
    }

    /// True when the assignment is complete and every edge joins differently
    /// labelled endpoints.
    pub fn is_valid(&self, graph: &ConstraintGraph) -> bool {
        self.is_complete() && graph.edges().all(|(u, v)| self.get(u) != self.get(v))
    }
}

/// Outcome of a backtracking run.
///
/// `assignment` is present iff a solution was found. `attempts` counts
/// tentative variable assignments (those passing the forward check);
/// exhausting the search with `aborted = false` proves no solution exists
/// under the given domains, while `aborted = true` means the cooperative
/// attempt budget ran out first and carries no verdict.
#[derive(Debug, Clone, Serialize)]
pub struct BacktrackReport {
    pub assignment: Option<Assignment>,
    pub attempts: u64,
    pub aborted: bool,
}

impl BacktrackReport {
    pub fn solved(&self) -> bool {
        self.assignment.is_some()
    }
}

/// One depth of the search: the variable branched on, the candidate values
/// still to try, and the snapshot taken before the depth's current tentative
/// assignment.
#[derive(Debug)]
struct Frame {
    var: VariableId,
    candidates: std::vec::IntoIter<LabelId>,
    snapshot: Option<DomainSnapshot>,
}

impl Frame {
    fn open(var: VariableId, store: &DomainStore) -> Self {
        Self {
            var,
            candidates: store.values(var).into_iter(),
            snapshot: None,
        }
    }
}

/// Depth-first search with forward checking and AC-3 propagation after every
/// tentative assignment.
///
/// The search keeps an explicit stack of [`Frame`]s instead of recursing;
/// each frame owns its candidate iterator and its pre-assignment snapshot,
/// so backtracking out of a failed branch restores the domain store exactly
/// before the sibling value is tried. Candidate values are taken in
/// ascending [`LabelId`] order from the domain as it stands when the frame
/// opens.
pub struct BacktrackingSolver {
    ordering: Box<dyn VariableOrdering>,
    max_attempts: Option<u64>,
}

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self {
            ordering: Box::new(AdjacentFirst),
            max_attempts: None,
        }
    }

    pub fn with_ordering(mut self, ordering: Box<dyn VariableOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Caps the number of tentative assignments; the search aborts
    /// cooperatively once the cap is reached.
    pub fn with_attempt_budget(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Searches for a complete valid assignment, branching on `start` first.
    pub fn solve(
        &self,
        graph: &ConstraintGraph,
        labels: &LabelSet,
        start: VariableId,
    ) -> BacktrackReport {
        let n = graph.variable_count();
        if n == 0 {
            return BacktrackReport {
                assignment: Some(Assignment::empty(0)),
                attempts: 0,
                aborted: false,
            };
        }
        assert!((start as usize) < n, "start variable out of range");

        let mut store = DomainStore::full(n, labels);
        let mut assignment = Assignment::empty(n);
        let mut attempts: u64 = 0;
        let mut frames = vec![Frame::open(start, &store)];

        loop {
            let frame = frames
                .last_mut()
                .expect("exhausting the root frame returns before the stack empties");

            let Some(value) = frame.candidates.next() else {
                // Every candidate for this variable failed: fail upwards and
                // let the parent undo its own tentative assignment.
                frames.pop();
                match frames.last_mut() {
                    Some(parent) => {
                        let snapshot = parent
                            .snapshot
                            .take()
                            .expect("open child implies parent snapshot");
                        store.restore(snapshot);
                        assignment.clear(parent.var);
                    }
                    None => {
                        debug!(attempts, "search space exhausted without a solution");
                        return BacktrackReport {
                            assignment: None,
                            attempts,
                            aborted: false,
                        };
                    }
                }
                continue;
            };
            let var = frame.var;

            // Forward check: reject a value an assigned neighbor already holds.
            if graph
                .neighbors(var)
                .iter()
                .any(|&z| assignment.get(z) == Some(value))
            {
                continue;
            }

            if self.max_attempts.is_some_and(|budget| attempts >= budget) {
                debug!(attempts, "attempt budget exhausted, aborting search");
                return BacktrackReport {
                    assignment: None,
                    attempts,
                    aborted: true,
                };
            }
            attempts += 1;

            // Tentative assignment: snapshot, narrow the domain to the chosen
            // value, and propagate from the arcs pointing at `var`.
            let snapshot = store.snapshot();
            assignment.set(var, value);
            store.restrict_to(var, value);
            let seed = graph.neighbors(var).iter().map(|&z| (z, var)).collect();
            let outcome = propagation::propagate(graph, &mut store, Some(seed));
            if !outcome.consistent {
                store.restore(snapshot);
                assignment.clear(var);
                continue;
            }

            if assignment.is_complete() {
                debug!(attempts, "search found a complete assignment");
                return BacktrackReport {
                    assignment: Some(assignment),
                    attempts,
                    aborted: false,
                };
            }

            let next = self
                .ordering
                .select(graph, &assignment, Some(var))
                .expect("incomplete assignment leaves a variable to select");
            frames
                .last_mut()
                .expect("frame stack is non-empty while branching")
                .snapshot = Some(snapshot);
            frames.push(Frame::open(next, &store));
        }
    }
}

impl Default for BacktrackingSolver {
    fn default() -> Self {
        Self::new()
    }
}
