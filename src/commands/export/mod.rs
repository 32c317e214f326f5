mod execute;
mod output;

pub use execute::ExportResult;

use clap::Args;

use crate::export::ExportFormat;

/// Run SQL and write the first result as delimited text
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sqlrepl export 'select * from plays'                    # Writes results.tsv
  sqlrepl export 'select * from plays' -o sacks --export-format csv
  sqlrepl export 'select * from plays' -o out/plays.csv   # Format from extension
  sqlrepl export 'select * from teams' --stdout --null-text NULL")]
pub struct ExportCmd {
    /// SQL whose first result is exported
    pub sql: String,

    /// Output file stem; a .tsv or .csv extension is kept and picks the format
    #[arg(short, long, default_value = "results")]
    pub output: String,

    /// Export format (defaults to the configured format, then tsv)
    #[arg(long, value_enum)]
    pub export_format: Option<ExportFormat>,

    /// Text written for NULL cells (defaults to the configured text, then empty)
    #[arg(long)]
    pub null_text: Option<String>,

    /// Print the export instead of writing a file
    #[arg(long, default_value_t = false)]
    pub stdout: bool,
}
