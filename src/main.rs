use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use tinct::{
    error::{Error, Result},
    parse::{self, Instance},
    solver::{
        backtracking::BacktrackReport,
        local_search::{LocalSearchReport, DEFAULT_DEADLINE},
        stats::{render_assignment_table, render_summary_table, RunSummary},
    },
};

/// Solve a graph-colouring instance with backtracking plus AC-3, then with
/// min-conflicts local search.
#[derive(Debug, Parser)]
#[command(name = "tinct", version, about)]
struct Cli {
    /// Instance file: labels, variables, then edges, blank-line separated.
    input: PathBuf,

    /// Seed for the local search's random generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Local-search wall-clock budget, in seconds.
    #[arg(long, default_value_t = DEFAULT_DEADLINE.as_secs())]
    deadline_secs: u64,

    /// Variable id the backtracking search branches on first.
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Skip the local-search phase.
    #[arg(long)]
    skip_local_search: bool,

    /// Emit a JSON report instead of tables.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let instance = parse::read_instance(&cli.input)?;
    let n = instance.graph.variable_count();
    if cli.start as usize >= n {
        return Err(Error::VariableOutOfRange(cli.start, n));
    }
    info!(
        variables = n,
        edges = instance.graph.edge_count(),
        labels = instance.labels.len(),
        "instance loaded"
    );

    let started = Instant::now();
    let backtrack = tinct::run_backtracking(&instance.graph, &instance.labels, cli.start);
    let backtrack_elapsed = started.elapsed();

    let local = (!cli.skip_local_search).then(|| {
        let deadline = Duration::from_secs(cli.deadline_secs);
        let started = Instant::now();
        let report = tinct::run_local_search(&instance.graph, &instance.labels, deadline, cli.seed);
        (report, started.elapsed())
    });

    if cli.json {
        print_json(&instance, &backtrack, local.as_ref().map(|(report, _)| report))?;
        return Ok(());
    }

    println!("Backtracking search with AC-3...");
    match &backtrack.assignment {
        Some(assignment) => {
            let rows = instance
                .graph
                .variables()
                .filter_map(|v| assignment.get(v).map(|l| (v, l)));
            print!(
                "{}",
                render_assignment_table(&instance.variables, &instance.labels, rows)
            );
            println!("Assignment attempts: {}", backtrack.attempts);
        }
        None if backtrack.aborted => println!(
            "Backtracking search aborted after {} attempts.",
            backtrack.attempts
        ),
        None => println!("Backtracking search found no solution."),
    }

    let mut summaries = vec![RunSummary {
        solver: "backtracking",
        solved: backtrack.solved(),
        steps: backtrack.attempts,
        elapsed: backtrack_elapsed,
    }];

    if let Some((report, local_elapsed)) = &local {
        println!("Random-restart local search...");
        match &report.colouring {
            Some(colouring) => {
                let rows = instance
                    .graph
                    .variables()
                    .map(|v| (v, colouring.get(v)));
                print!(
                    "{}",
                    render_assignment_table(&instance.variables, &instance.labels, rows)
                );
                println!("Improving moves: {}", report.improving_moves);
            }
            None => println!(
                "Local search deadline of {}s exceeded.",
                cli.deadline_secs
            ),
        }
        summaries.push(RunSummary {
            solver: "local search",
            solved: report.solved(),
            steps: report.improving_moves,
            elapsed: *local_elapsed,
        });
    }

    print!("{}", render_summary_table(&summaries));
    Ok(())
}

fn print_json(
    instance: &Instance,
    backtrack: &BacktrackReport,
    local: Option<&LocalSearchReport>,
) -> Result<()> {
    let named = |label: u32| serde_json::Value::from(instance.labels.name(label));
    let backtrack_assignment = backtrack.assignment.as_ref().map(|assignment| {
        instance
            .variables
            .iter()
            .enumerate()
            .filter_map(|(v, name)| {
                assignment
                    .get(v as u32)
                    .map(|l| (name.clone(), named(l)))
            })
            .collect::<serde_json::Map<String, serde_json::Value>>()
    });
    let local_assignment = local.and_then(|report| report.colouring.as_ref()).map(|c| {
        instance
            .variables
            .iter()
            .enumerate()
            .map(|(v, name)| (name.clone(), named(c.get(v as u32))))
            .collect::<serde_json::Map<String, serde_json::Value>>()
    });

    let payload = serde_json::json!({
        "backtracking": {
            "solved": backtrack.solved(),
            "attempts": backtrack.attempts,
            "aborted": backtrack.aborted,
            "assignment": backtrack_assignment,
        },
        "local_search": local.map(|report| serde_json::json!({
            "solved": report.solved(),
            "improving_moves": report.improving_moves,
            "restarts": report.restarts,
            "assignment": local_assignment,
        })),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
