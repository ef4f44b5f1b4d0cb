use crate::error::{Error, Result};

/// Identifies a variable, a node of the constraint graph.
pub type VariableId = u32;

/// Identifies a label by its position in the [`LabelSet`].
pub type LabelId = u32;

/// The shared, immutable set of labels, in insertion order.
///
/// Insertion order is the value order used everywhere: domain iteration,
/// value ordering in the backtracking search and candidate order in the
/// hill-climb all follow ascending [`LabelId`], which keeps runs
/// reproducible.
#[derive(Debug, Clone)]
pub struct LabelSet {
    names: Vec<String>,
}

impl LabelSet {
    /// Builds a label set from distinct names. Duplicates are rejected; an
    /// empty set is allowed at this level (the file parser enforces a
    /// non-empty label block separately).
    pub fn from_names<I>(names: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if collected.contains(&name) {
                return Err(Error::RepeatedLabel(name));
            }
            collected.push(name);
        }
        Ok(Self { names: collected })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All label ids, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = LabelId> {
        0..self.names.len() as LabelId
    }

    pub fn name(&self, id: LabelId) -> &str {
        &self.names[id as usize]
    }

    pub fn id_of(&self, name: &str) -> Option<LabelId> {
        self.names.iter().position(|n| n == name).map(|i| i as LabelId)
    }
}

/// Immutable symmetric adjacency over variables.
///
/// Every edge means "endpoints must take different labels". The structure is
/// built once through [`GraphBuilder`] and never mutated afterwards; both
/// solvers share it read-only. Neighbor order is the order edges were added,
/// fixed at construction, and is relied on by the variable-ordering
/// heuristics.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    adj_list: Vec<Vec<VariableId>>,
    m: usize,
}

impl ConstraintGraph {
    pub fn builder(variable_count: usize) -> GraphBuilder {
        GraphBuilder {
            adj_list: vec![Vec::new(); variable_count],
        }
    }

    pub fn variable_count(&self) -> usize {
        self.adj_list.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.m
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> {
        0..self.adj_list.len() as VariableId
    }

    /// Neighbors of `v`, in edge-insertion order.
    pub fn neighbors(&self, v: VariableId) -> &[VariableId] {
        &self.adj_list[v as usize]
    }

    pub fn degree(&self, v: VariableId) -> usize {
        self.adj_list[v as usize].len()
    }

    pub fn are_adjacent(&self, u: VariableId, v: VariableId) -> bool {
        self.adj_list[u as usize].iter().any(|&w| w == v)
    }

    /// Each undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (VariableId, VariableId)> + '_ {
        self.adj_list.iter().enumerate().flat_map(|(u, adj)| {
            let u = u as VariableId;
            adj.iter().filter(move |&&v| u < v).map(move |&v| (u, v))
        })
    }
}

/// Accumulates undirected edges, then freezes into a [`ConstraintGraph`].
#[derive(Debug)]
pub struct GraphBuilder {
    adj_list: Vec<Vec<VariableId>>,
}

impl GraphBuilder {
    /// Records the undirected edge `a -- b` in both directions. Self-loops
    /// and out-of-range endpoints are rejected; a duplicate of an edge
    /// already present is ignored.
    pub fn add_edge(&mut self, a: VariableId, b: VariableId) -> Result<()> {
        let n = self.adj_list.len();
        if a as usize >= n {
            return Err(Error::VariableOutOfRange(a, n));
        }
        if b as usize >= n {
            return Err(Error::VariableOutOfRange(b, n));
        }
        if a == b {
            return Err(Error::LoopEdge(a));
        }
        if self.adj_list[a as usize].contains(&b) {
            return Ok(());
        }
        self.adj_list[a as usize].push(b);
        self.adj_list[b as usize].push(a);
        Ok(())
    }

    pub fn build(self) -> ConstraintGraph {
        let m = self.adj_list.iter().map(Vec::len).sum::<usize>() / 2;
        ConstraintGraph {
            adj_list: self.adj_list,
            m,
        }
    }
}
