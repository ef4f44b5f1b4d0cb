use im::OrdSet;

use crate::solver::graph::{LabelId, LabelSet, VariableId};

/// The current candidate labels of every variable, one ordered set each.
///
/// Domains are `im::OrdSet`s: iteration is ascending [`LabelId`] (label-set
/// insertion order), which fixes value ordering, and clones share structure,
/// so a [`DomainSnapshot`] of the whole store costs one shallow clone per
/// variable. The backtracking search snapshots before every propagation and
/// restores on failure; propagation additionally reports a removal trail for
/// exact trail-based undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    domains: Vec<OrdSet<LabelId>>,
}

/// A saved copy of every domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSnapshot {
    domains: Vec<OrdSet<LabelId>>,
}

impl DomainStore {
    /// A store where every variable's domain is the full label set.
    pub fn full(variable_count: usize, labels: &LabelSet) -> Self {
        let all: OrdSet<LabelId> = labels.ids().collect();
        Self {
            domains: vec![all; variable_count],
        }
    }

    pub fn variable_count(&self) -> usize {
        self.domains.len()
    }

    pub fn len(&self, v: VariableId) -> usize {
        self.domains[v as usize].len()
    }

    pub fn is_empty(&self, v: VariableId) -> bool {
        self.domains[v as usize].is_empty()
    }

    pub fn is_singleton(&self, v: VariableId) -> bool {
        self.len(v) == 1
    }

    /// The single remaining value of `v`'s domain, if it is a singleton.
    pub fn singleton(&self, v: VariableId) -> Option<LabelId> {
        if self.is_singleton(v) {
            self.domains[v as usize].get_min().copied()
        } else {
            None
        }
    }

    pub fn contains(&self, v: VariableId, label: LabelId) -> bool {
        self.domains[v as usize].contains(&label)
    }

    /// The values of `v`'s domain, ascending.
    pub fn iter(&self, v: VariableId) -> impl Iterator<Item = LabelId> + '_ {
        self.domains[v as usize].iter().copied()
    }

    /// The values of `v`'s domain collected in ascending order. Used where
    /// the domain will be mutated while the values are walked.
    pub fn values(&self, v: VariableId) -> Vec<LabelId> {
        self.iter(v).collect()
    }

    /// Removes `label` from `v`'s domain; true if it was present.
    pub fn remove(&mut self, v: VariableId, label: LabelId) -> bool {
        self.domains[v as usize].remove(&label).is_some()
    }

    /// Shrinks `v`'s domain to the single value `label`, the domain-level
    /// form of a tentative assignment.
    pub fn restrict_to(&mut self, v: VariableId, label: LabelId) {
        debug_assert!(self.contains(v, label));
        self.domains[v as usize] = OrdSet::unit(label);
    }

    pub fn snapshot(&self) -> DomainSnapshot {
        DomainSnapshot {
            domains: self.domains.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: DomainSnapshot) {
        debug_assert_eq!(snapshot.domains.len(), self.domains.len());
        self.domains = snapshot.domains;
    }

    /// Replays a removal trail backwards, reinserting every `(variable,
    /// label)` pair. Applied to the trail reported by a propagation run this
    /// reproduces the pre-propagation domains exactly.
    pub fn undo(&mut self, removals: &[(VariableId, LabelId)]) {
        for &(v, label) in removals.iter().rev() {
            self.domains[v as usize].insert(label);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::graph::LabelSet;

    fn labels() -> LabelSet {
        LabelSet::from_names(["red", "green", "blue"]).unwrap()
    }

    #[test]
    fn full_store_holds_every_label_for_every_variable() {
        let store = DomainStore::full(2, &labels());
        for v in 0..2 {
            assert_eq!(store.values(v), vec![0, 1, 2]);
            assert!(!store.is_singleton(v));
        }
    }

    #[test]
    fn iteration_is_ascending_label_order() {
        let mut store = DomainStore::full(1, &labels());
        store.remove(0, 1);
        assert_eq!(store.values(0), vec![0, 2]);
    }

    #[test]
    fn restrict_to_leaves_a_singleton() {
        let mut store = DomainStore::full(1, &labels());
        store.restrict_to(0, 2);
        assert!(store.is_singleton(0));
        assert_eq!(store.singleton(0), Some(2));
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut store = DomainStore::full(3, &labels());
        let snapshot = store.snapshot();
        store.remove(0, 0);
        store.restrict_to(1, 1);
        store.remove(2, 2);
        assert_ne!(store.snapshot(), snapshot);
        store.restore(snapshot.clone());
        assert_eq!(store.snapshot(), snapshot);
    }

    #[test]
    fn undo_replays_a_removal_trail_in_reverse() {
        let mut store = DomainStore::full(2, &labels());
        let before = store.clone();
        let mut trail = Vec::new();
        for (v, label) in [(0, 1), (0, 2), (1, 0)] {
            assert!(store.remove(v, label));
            trail.push((v, label));
        }
        store.undo(&trail);
        assert_eq!(store, before);
    }
}
