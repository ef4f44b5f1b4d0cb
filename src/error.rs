pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while reading an instance file or constructing the
/// constraint graph.
///
/// Search outcomes are deliberately absent: both solvers report "no solution
/// found" through their result values, not through `Err`. Anything here means
/// the input never produced a well-formed problem in the first place.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: duplicate label `{name}`")]
    DuplicateLabel { line: usize, name: String },

    #[error("line {line}: duplicate variable `{name}`")]
    DuplicateVariable { line: usize, name: String },

    #[error("line {line}: edge references unknown variable `{name}`")]
    UnknownVariable { line: usize, name: String },

    #[error("line {line}: expected `<variable> <variable>`, found `{text}`")]
    MalformedEdge { line: usize, text: String },

    #[error("line {line}: edge `{name} {name}` is a self-loop")]
    SelfLoop { line: usize, name: String },

    #[error("input ended before the {0} block")]
    MissingBlock(&'static str),

    #[error("the {0} block is empty")]
    EmptyBlock(&'static str),

    #[error("label `{0}` appears twice in the label set")]
    RepeatedLabel(String),

    #[error("variable {0} is out of range for a graph of {1} variables")]
    VariableOutOfRange(u32, usize),

    #[error("edge ({0}, {0}) is a self-loop")]
    LoopEdge(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialise report: {0}")]
    Report(#[from] serde_json::Error),
}
