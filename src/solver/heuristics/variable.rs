//! Variable-selection policies for the backtracking search.

use crate::solver::{
    backtracking::Assignment,
    graph::{ConstraintGraph, VariableId},
};

/// Chooses which unassigned variable the search branches on next.
///
/// `last` is the most recently assigned variable, if any. Implementations
/// must be deterministic: the same graph and assignment always yield the
/// same choice, so search traces are reproducible.
pub trait VariableOrdering {
    /// Selects the next variable to branch on, or `None` when every variable
    /// is already assigned.
    fn select(
        &self,
        graph: &ConstraintGraph,
        assignment: &Assignment,
        last: Option<VariableId>,
    ) -> Option<VariableId>;
}

/// Prefers an unassigned neighbor of the most recently assigned variable,
/// taken in neighbor order, so propagation stays local to the frontier of
/// the search. Falls back to the lowest unassigned id when the frontier has
/// no unassigned neighbor left.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdjacentFirst;

impl VariableOrdering for AdjacentFirst {
    fn select(
        &self,
        graph: &ConstraintGraph,
        assignment: &Assignment,
        last: Option<VariableId>,
    ) -> Option<VariableId> {
        if let Some(last) = last {
            let adjacent = graph
                .neighbors(last)
                .iter()
                .copied()
                .find(|&v| !assignment.is_assigned(v));
            if adjacent.is_some() {
                return adjacent;
            }
        }
        graph.variables().find(|&v| !assignment.is_assigned(v))
    }
}

/// Selects the unassigned variable with the smallest id, ignoring adjacency.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectFirst;

impl VariableOrdering for SelectFirst {
    fn select(
        &self,
        graph: &ConstraintGraph,
        assignment: &Assignment,
        _last: Option<VariableId>,
    ) -> Option<VariableId> {
        graph.variables().find(|&v| !assignment.is_assigned(v))
    }
}
