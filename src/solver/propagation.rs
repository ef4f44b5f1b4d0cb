use tracing::debug;

use crate::solver::{
    domain::DomainStore,
    graph::{ConstraintGraph, LabelId, VariableId},
    work_list::WorkList,
};

/// Result of one propagation run.
///
/// `removed` lists every pruned `(variable, label)` pair in removal order,
/// whether or not the run ended consistent; replaying it in reverse (see
/// [`DomainStore::undo`]) restores the pre-propagation domains exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationOutcome {
    pub consistent: bool,
    pub removed: Vec<(VariableId, LabelId)>,
}

/// Enforces arc consistency (AC-3) for the graph's inequality constraints.
///
/// `seed` selects the arcs examined first; `None` seeds every ordered
/// neighbor pair. Arcs are processed to fixpoint: whenever a domain shrinks,
/// every arc pointing at the shrunk variable (except the one just used) is
/// re-enqueued. An emptied domain stops the run immediately with
/// `consistent = false`.
///
/// This is a pruning step, not a solver: a consistent outcome does not imply
/// a solution exists, only that no removed value could have appeared in one.
pub fn propagate(
    graph: &ConstraintGraph,
    store: &mut DomainStore,
    seed: Option<Vec<(VariableId, VariableId)>>,
) -> PropagationOutcome {
    let mut worklist = WorkList::new();
    match seed {
        Some(arcs) => {
            for arc in arcs {
                worklist.push_back(arc);
            }
        }
        None => {
            for x in graph.variables() {
                for &y in graph.neighbors(x) {
                    worklist.push_back((x, y));
                }
            }
        }
    }

    let mut removed = Vec::new();
    while let Some((x, y)) = worklist.pop_front() {
        if !revise(store, x, y, &mut removed) {
            continue;
        }
        if store.is_empty(x) {
            debug!(variable = x, "domain wiped out during propagation");
            return PropagationOutcome {
                consistent: false,
                removed,
            };
        }
        for &z in graph.neighbors(x) {
            if z != y {
                worklist.push_back((z, x));
            }
        }
    }

    PropagationOutcome {
        consistent: true,
        removed,
    }
}

/// Drops the values of `domain(x)` with no support in `domain(y)` under the
/// inequality constraint. A value `v` is unsupported iff `domain(y)` is
/// empty or exactly `{v}`. Returns whether anything was removed.
fn revise(
    store: &mut DomainStore,
    x: VariableId,
    y: VariableId,
    removed: &mut Vec<(VariableId, LabelId)>,
) -> bool {
    let mut change = false;
    for v in store.values(x) {
        let supported = match store.singleton(y) {
            Some(w) => w != v,
            None => !store.is_empty(y),
        };
        if !supported {
            store.remove(x, v);
            removed.push((x, v));
            change = true;
        }
    }
    change
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::graph::LabelSet;

    fn two_labels() -> LabelSet {
        LabelSet::from_names(["red", "green"]).unwrap()
    }

    fn path_graph(n: usize) -> ConstraintGraph {
        let mut builder = ConstraintGraph::builder(n);
        for v in 1..n as VariableId {
            builder.add_edge(v - 1, v).unwrap();
        }
        builder.build()
    }

    #[test]
    fn wide_domains_prune_nothing() {
        let graph = path_graph(3);
        let mut store = DomainStore::full(3, &two_labels());
        let outcome = propagate(&graph, &mut store, None);
        assert!(outcome.consistent);
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn a_singleton_prunes_its_neighbors() {
        let graph = path_graph(2);
        let mut store = DomainStore::full(2, &two_labels());
        store.restrict_to(0, 0);
        let outcome = propagate(&graph, &mut store, None);
        assert!(outcome.consistent);
        assert_eq!(outcome.removed, vec![(1, 0)]);
        assert_eq!(store.singleton(1), Some(1));
    }

    #[test]
    fn pruning_cascades_along_a_path() {
        let graph = path_graph(3);
        let mut store = DomainStore::full(3, &two_labels());
        store.restrict_to(0, 0);
        let outcome = propagate(&graph, &mut store, None);
        assert!(outcome.consistent);
        assert_eq!(store.singleton(1), Some(1));
        assert_eq!(store.singleton(2), Some(0));
    }

    #[test]
    fn a_seeded_run_reaches_the_same_fixpoint() {
        let graph = path_graph(3);
        let mut store = DomainStore::full(3, &two_labels());
        store.restrict_to(0, 0);
        let seed = graph.neighbors(0).iter().map(|&z| (z, 0)).collect();
        let outcome = propagate(&graph, &mut store, Some(seed));
        assert!(outcome.consistent);
        assert_eq!(store.singleton(1), Some(1));
        assert_eq!(store.singleton(2), Some(0));
    }

    #[test]
    fn a_wiped_out_domain_reports_inconsistency() {
        let labels = LabelSet::from_names(["red"]).unwrap();
        let graph = path_graph(2);
        let mut store = DomainStore::full(2, &labels);
        let before = store.snapshot();
        let outcome = propagate(&graph, &mut store, None);
        assert!(!outcome.consistent);
        assert!(!outcome.removed.is_empty());
        store.undo(&outcome.removed);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn the_removal_trail_restores_the_exact_domains() {
        let graph = path_graph(4);
        let labels = LabelSet::from_names(["red", "green", "blue"]).unwrap();
        let mut store = DomainStore::full(4, &labels);
        store.restrict_to(1, 2);
        store.remove(2, 0);
        let before = store.clone();
        let outcome = propagate(&graph, &mut store, None);
        assert!(outcome.consistent);
        store.undo(&outcome.removed);
        assert_eq!(store, before);
    }

    mod prop_tests {
        use proptest::prelude::*;

        use super::*;

        fn arbitrary_problem() -> impl Strategy<
            Value = (
                usize,
                Vec<(VariableId, VariableId)>,
                Vec<(VariableId, LabelId)>,
            ),
        > {
            (2..10usize).prop_flat_map(|n| {
                let edges = proptest::collection::vec(
                    (0..n as VariableId, 0..n as VariableId)
                        .prop_filter("no self-loops", |(a, b)| a != b),
                    0..=(n * (n - 1) / 2).min(20),
                );
                let restrictions =
                    proptest::collection::vec((0..n as VariableId, 0..3u32), 0..3);
                (Just(n), edges, restrictions)
            })
        }

        proptest! {
            // Replaying a propagation's removal trail in reverse must give
            // back the pre-propagation store, whatever the graph and however
            // the domains were narrowed beforehand.
            #[test]
            fn removal_trails_always_restore_exactly(
                (n, edges, restrictions) in arbitrary_problem()
            ) {
                let labels = LabelSet::from_names(["red", "green", "blue"]).unwrap();
                let mut builder = ConstraintGraph::builder(n);
                for (a, b) in edges {
                    builder.add_edge(a, b).unwrap();
                }
                let graph = builder.build();

                let mut store = DomainStore::full(n, &labels);
                for (v, label) in restrictions {
                    if store.contains(v, label) {
                        store.restrict_to(v, label);
                    }
                }
                let before = store.clone();

                let outcome = propagate(&graph, &mut store, None);
                store.undo(&outcome.removed);
                prop_assert_eq!(store, before);
            }
        }
    }
}
