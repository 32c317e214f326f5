//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - `execute.rs`: the `Execute` impl and its result type
//! - `output.rs`: the `Outputable` impl for that result
//! - `cli_tests.rs`, `execute_tests.rs`, `output_tests.rs`

mod export;
mod query;
mod repl;
mod schema;

pub use export::{ExportCmd, ExportResult};
pub use query::{QueryCmd, QueryOutput};
pub use repl::{run_repl, ReplCmd, ReplSummary};
pub use schema::{SchemaCmd, SchemaOutput};

use clap::Subcommand;
use std::error::Error;

use crate::output::{OutputFormat, Outputable};
use crate::session::Session;

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, session: &mut Session) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run SQL against the dataset and show the result
    Query(QueryCmd),

    /// List the dataset's tables and their columns
    Schema(SchemaCmd),

    /// Run SQL and write the result as delimited text
    Export(ExportCmd),

    /// Interactive SQL prompt
    Repl(ReplCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, session: &mut Session, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Query(cmd) => {
                let result = cmd.execute(session)?;
                Ok(result.format(format))
            }
            Command::Schema(cmd) => {
                let result = cmd.execute(session)?;
                Ok(result.format(format))
            }
            Command::Export(cmd) => {
                let result = cmd.execute(session)?;
                Ok(result.format(format))
            }
            Command::Repl(cmd) => {
                let result = cmd.with_format(format).execute(session)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().unwrap_or(&String::new())).into())
            }
        }
    }
}
