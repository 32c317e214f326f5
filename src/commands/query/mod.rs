mod execute;
mod execute_tests;
mod output;

pub use execute::QueryOutput;

use clap::Args;

/// Run SQL against the dataset and show the result
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sqlrepl query 'select * from plays limit 5'
  sqlrepl query 'select count(*) from plays; select count(*) from teams' --all
  sqlrepl --format json query 'select formation, count(*) from plays group by formation'")]
pub struct QueryCmd {
    /// SQL to run; several `;`-separated statements are allowed
    pub sql: String,

    /// Show every statement's result, not only the first
    #[arg(short, long, default_value_t = false)]
    pub all: bool,
}
