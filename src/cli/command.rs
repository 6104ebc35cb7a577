use crate::explain::ExplainVerbosity;

/// Programmatic form of the `crud-usage` subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the step catalogue.
    List,
    /// Run the usage example, optionally restricted to some steps or groups.
    Run {
        only: Vec<String>,
        fail_fast: bool,
    },
    /// Explain a single `count` or `find`.
    Explain {
        kind: String,
        filter_json: Option<String>,
        verbosity: ExplainVerbosity,
    },
    Version,
}

impl Command {
    /// Whether the command talks to the collection. `List` and `Version` do not.
    pub fn needs_collection(&self) -> bool {
        matches!(self, Command::Run { .. } | Command::Explain { .. })
    }
}
