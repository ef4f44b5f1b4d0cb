use std::time::Duration;

use prettytable::{Cell, Row, Table};

use crate::solver::graph::{LabelId, LabelSet, VariableId};

/// Renders a solved assignment as a variable/label table, in variable order.
pub fn render_assignment_table<I>(
    variable_names: &[String],
    labels: &LabelSet,
    assignment: I,
) -> String
where
    I: IntoIterator<Item = (VariableId, LabelId)>,
{
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Variable"), Cell::new("Label")]));
    for (var, label) in assignment {
        table.add_row(Row::new(vec![
            Cell::new(&variable_names[var as usize]),
            Cell::new(labels.name(label)),
        ]));
    }
    table.to_string()
}

/// One solver invocation, summarised for the end-of-run table.
pub struct RunSummary {
    pub solver: &'static str,
    pub solved: bool,
    pub steps: u64,
    pub elapsed: Duration,
}

pub fn render_summary_table(runs: &[RunSummary]) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Solver"),
        Cell::new("Solved"),
        Cell::new("Steps"),
        Cell::new("Time (ms)"),
    ]));
    for run in runs {
        table.add_row(Row::new(vec![
            Cell::new(run.solver),
            Cell::new(if run.solved { "yes" } else { "no" }),
            Cell::new(&run.steps.to_string()),
            Cell::new(&format!("{:.2}", run.elapsed.as_secs_f64() * 1000.0)),
        ]));
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_table_shows_names_not_ids() {
        let labels = LabelSet::from_names(["red", "green"]).unwrap();
        let names = vec!["A".to_string(), "B".to_string()];
        let rendered = render_assignment_table(&names, &labels, [(0, 0), (1, 1)]);
        assert!(rendered.contains('A'));
        assert!(rendered.contains("green"));
        assert!(!rendered.contains('0'));
    }

    #[test]
    fn summary_table_lists_every_run() {
        let rendered = render_summary_table(&[
            RunSummary {
                solver: "backtracking",
                solved: true,
                steps: 12,
                elapsed: Duration::from_millis(3),
            },
            RunSummary {
                solver: "local search",
                solved: false,
                steps: 40,
                elapsed: Duration::from_millis(9),
            },
        ]);
        assert!(rendered.contains("backtracking"));
        assert!(rendered.contains("local search"));
        assert!(rendered.contains("12"));
    }
}
