mod execute;
mod output;

pub use execute::SchemaOutput;

use clap::Args;

/// List the dataset's tables and their columns
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sqlrepl schema                    # Every table with its columns
  sqlrepl schema -t plays           # One table, with its definition
  sqlrepl schema --hints            # Table -> columns map for editor completion
  sqlrepl schema --all-objects      # Include indexes, views and triggers")]
pub struct SchemaCmd {
    /// Only show this table (exact name)
    #[arg(short, long)]
    pub table: Option<String>,

    /// Emit completion hints (table name -> column names) instead
    #[arg(long, default_value_t = false)]
    pub hints: bool,

    /// Include every catalog object, not only tables
    #[arg(long, default_value_t = false)]
    pub all_objects: bool,
}
