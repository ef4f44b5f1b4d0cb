//! Parser for the line-oriented instance format.
//!
//! Three blocks separated by blank lines: label names, variable names, then
//! one edge per line as `"<variable> <variable>"`. Edges are undirected and
//! recorded in both directions. Every diagnostic carries the 1-based line
//! number of the offending token.

use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{Error, Result},
    solver::graph::{ConstraintGraph, LabelSet, VariableId},
};

/// A parsed problem instance: the label set, the variable names in
/// declaration order, and the constraint graph over their dense ids.
#[derive(Debug, Clone)]
pub struct Instance {
    pub labels: LabelSet,
    pub variables: Vec<String>,
    pub graph: ConstraintGraph,
}

impl Instance {
    pub fn variable_id(&self, name: &str) -> Option<VariableId> {
        self.variables
            .iter()
            .position(|n| n == name)
            .map(|i| i as VariableId)
    }
}

/// Reads and parses an instance file.
pub fn read_instance(path: &Path) -> Result<Instance> {
    parse_instance(&std::fs::read_to_string(path)?)
}

/// Parses an instance from its textual form.
pub fn parse_instance(input: &str) -> Result<Instance> {
    #[derive(PartialEq, PartialOrd)]
    enum Block {
        Labels,
        Variables,
        Edges,
    }

    let mut block = Block::Labels;
    let mut label_names: Vec<String> = Vec::new();
    let mut variables: Vec<String> = Vec::new();
    let mut variable_ids: HashMap<String, VariableId> = HashMap::new();
    let mut edges: Vec<(VariableId, VariableId)> = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() {
            block = match block {
                Block::Labels => Block::Variables,
                _ => Block::Edges,
            };
            continue;
        }
        match block {
            Block::Labels => {
                if label_names.iter().any(|n| n == text) {
                    return Err(Error::DuplicateLabel {
                        line,
                        name: text.to_string(),
                    });
                }
                label_names.push(text.to_string());
            }
            Block::Variables => {
                if variable_ids.contains_key(text) {
                    return Err(Error::DuplicateVariable {
                        line,
                        name: text.to_string(),
                    });
                }
                variable_ids.insert(text.to_string(), variables.len() as VariableId);
                variables.push(text.to_string());
            }
            Block::Edges => {
                let mut tokens = text.split_whitespace();
                let (Some(a), Some(b), None) = (tokens.next(), tokens.next(), tokens.next())
                else {
                    return Err(Error::MalformedEdge {
                        line,
                        text: text.to_string(),
                    });
                };
                if a == b {
                    return Err(Error::SelfLoop {
                        line,
                        name: a.to_string(),
                    });
                }
                let resolve = |name: &str| {
                    variable_ids
                        .get(name)
                        .copied()
                        .ok_or_else(|| Error::UnknownVariable {
                            line,
                            name: name.to_string(),
                        })
                };
                edges.push((resolve(a)?, resolve(b)?));
            }
        }
    }

    if block < Block::Edges {
        return Err(Error::MissingBlock(match block {
            Block::Labels => "variable",
            _ => "edge",
        }));
    }
    if label_names.is_empty() {
        return Err(Error::EmptyBlock("label"));
    }
    if variables.is_empty() {
        return Err(Error::EmptyBlock("variable"));
    }

    let labels = LabelSet::from_names(label_names)?;
    let mut builder = ConstraintGraph::builder(variables.len());
    for (a, b) in edges {
        builder.add_edge(a, b)?;
    }

    Ok(Instance {
        labels,
        variables,
        graph: builder.build(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "\
red
green
blue

A
B
C

A B
B C
";

    #[test]
    fn parses_the_reference_instance() {
        let instance = parse_instance(REFERENCE).unwrap();
        assert_eq!(instance.labels.len(), 3);
        assert_eq!(instance.labels.name(2), "blue");
        assert_eq!(instance.variables, vec!["A", "B", "C"]);
        assert_eq!(instance.graph.edge_count(), 2);
        // Both directions of each edge are recorded.
        assert_eq!(instance.graph.neighbors(1), &[0, 2]);
        assert_eq!(instance.variable_id("C"), Some(2));
    }

    #[test]
    fn an_empty_edge_block_is_a_valid_graph() {
        let instance = parse_instance("red\n\nA\nB\n\n").unwrap();
        assert_eq!(instance.graph.edge_count(), 0);
        assert_eq!(instance.graph.variable_count(), 2);
    }

    #[test]
    fn a_missing_block_is_diagnosed() {
        assert!(matches!(
            parse_instance("red\ngreen\n"),
            Err(Error::MissingBlock("variable"))
        ));
        assert!(matches!(
            parse_instance("red\n\nA\nB\n"),
            Err(Error::MissingBlock("edge"))
        ));
    }

    #[test]
    fn duplicate_variables_carry_their_line_number() {
        let err = parse_instance("red\n\nA\nA\n\n").unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateVariable { line: 4, ref name } if name == "A"
        ));
    }

    #[test]
    fn duplicate_labels_carry_their_line_number() {
        let err = parse_instance("red\nred\n\nA\n\n").unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateLabel { line: 2, ref name } if name == "red"
        ));
    }

    #[test]
    fn edges_over_unknown_variables_are_rejected() {
        let err = parse_instance("red\n\nA\nB\n\nA D\n").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownVariable { line: 6, ref name } if name == "D"
        ));
    }

    #[test]
    fn malformed_edge_lines_are_rejected() {
        let err = parse_instance("red\n\nA\nB\n\nA\n").unwrap_err();
        assert!(matches!(err, Error::MalformedEdge { line: 6, .. }));
        let err = parse_instance("red\n\nA\nB\n\nA B C\n").unwrap_err();
        assert!(matches!(err, Error::MalformedEdge { line: 6, .. }));
    }

    #[test]
    fn self_loop_edges_are_rejected() {
        let err = parse_instance("red\n\nA\nB\n\nA A\n").unwrap_err();
        assert!(matches!(err, Error::SelfLoop { line: 6, ref name } if name == "A"));
    }

    #[test]
    fn an_empty_label_block_is_rejected() {
        let err = parse_instance("\nA\n\n").unwrap_err();
        assert!(matches!(err, Error::EmptyBlock("label")));
    }
}
