mod execute;
mod output;

pub use execute::{run_repl, ReplSummary};

use clap::Args;

use crate::output::OutputFormat;

/// Interactive SQL prompt
#[derive(Args, Debug, Default)]
#[command(after_help = "\
Statements run when a line ends with ';'. Lines starting with '.' on an
empty buffer are commands; type .help at the prompt to list them.

Examples:
  sqlrepl repl
  echo 'select count(*) from plays;' | sqlrepl repl")]
pub struct ReplCmd {
    /// Suggested first query, shown in the banner
    #[arg(skip)]
    pub suggestion: Option<String>,

    /// Format used for everything the prompt prints
    #[arg(skip)]
    pub format: OutputFormat,
}

impl ReplCmd {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_suggestion(mut self, query: impl Into<String>) -> Self {
        self.suggestion = Some(query.into());
        self
    }
}
