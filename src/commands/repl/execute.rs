use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use super::ReplCmd;
use crate::commands::{Execute, SchemaCmd};
use crate::export::{export_file_name, write_export, ExportFormat, ExportOptions};
use crate::output::{OutputFormat, Outputable};
use crate::session::{QueryState, Session};

const PROMPT: &str = "sql> ";
const CONTINUATION_PROMPT: &str = "...> ";

const HELP: &str = "\
.tables            List tables
.schema [TABLE]    Show columns of every table, or one table with its definition
.hints             Table -> columns map
.export PATH       Write the current result (.csv or .tsv, else the configured format)
.help              Show this help
.quit / .exit      Leave the prompt

End a statement with ';' to run it.";

/// Totals for one prompt session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplSummary {
    /// Statements handed to the engine
    pub submitted: usize,
    /// Of those, how many the engine rejected
    pub failed: usize,
}

enum Flow {
    Continue,
    Quit,
}

struct Repl<'a, W: Write> {
    session: &'a mut Session,
    out: W,
    format: OutputFormat,
    summary: ReplSummary,
}

impl<W: Write> Repl<'_, W> {
    fn prompt(&mut self, continuing: bool) -> io::Result<()> {
        let prompt = if continuing { CONTINUATION_PROMPT } else { PROMPT };
        write!(self.out, "{}", prompt)?;
        self.out.flush()
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    fn submit(&mut self, sql: &str) -> Result<(), Box<dyn Error>> {
        let state = self.session.submit(sql)?;
        self.summary.submitted += 1;
        if let QueryState::HasError(_) = state {
            self.summary.failed += 1;
        }
        let view = self.session.view().format(self.format);
        self.print(&view)?;
        Ok(())
    }

    fn schema(&mut self, cmd: SchemaCmd) -> io::Result<()> {
        match cmd.execute(&mut *self.session) {
            Ok(output) => {
                let text = output.format(self.format);
                self.print(&text)
            }
            Err(err) => self.print(&format!("Error: {}", err)),
        }
    }

    fn export(&mut self, target: &str) -> io::Result<()> {
        let Some(result) = self.session.current_result() else {
            return self.print("Error: No result to export");
        };

        let defaults = self.session.export_options();
        let target = PathBuf::from(target);
        let (path, format) = match ExportFormat::from_extension(&target) {
            Some(format) => (target, format),
            None => {
                let stem = target.to_string_lossy();
                (PathBuf::from(export_file_name(&stem, defaults.format)), defaults.format)
            }
        };
        let options = ExportOptions {
            format,
            null_text: defaults.null_text.clone(),
        };

        match write_export(&path, &result, &options) {
            Ok(path) => self.print(&format!(
                "Exported {} rows to {}",
                result.row_count(),
                path.display()
            )),
            Err(err) => self.print(&format!("Error: {}", err)),
        }
    }

    fn meta(&mut self, line: &str) -> io::Result<Flow> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();
        debug!(command, "Meta command");

        match command {
            ".quit" | ".exit" => return Ok(Flow::Quit),
            ".help" => self.print(HELP)?,
            ".tables" => {
                let names: Vec<String> = self
                    .session
                    .catalog()
                    .iter()
                    .filter(|t| t.is_table())
                    .map(|t| t.name.clone())
                    .collect();
                self.print(&names.join("\n"))?;
            }
            ".schema" => self.schema(SchemaCmd {
                table: argument.map(str::to_string),
                hints: false,
                all_objects: false,
            })?,
            ".hints" => self.schema(SchemaCmd {
                table: None,
                hints: true,
                all_objects: false,
            })?,
            ".export" => match argument {
                Some(target) => self.export(target)?,
                None => self.print("Usage: .export PATH")?,
            },
            other => self.print(&format!("Unknown command: {} (try .help)", other))?,
        }
        Ok(Flow::Continue)
    }
}

/// Read statements from `input` until `.quit` or end of input.
///
/// Lines accumulate until one ends with `;`, then the buffer is submitted
/// and the session view printed. End of input submits a non-blank
/// leftover buffer.
pub fn run_repl<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: W,
    format: OutputFormat,
    suggestion: Option<&str>,
) -> Result<ReplSummary, Box<dyn Error>> {
    let mut repl = Repl {
        session,
        out,
        format,
        summary: ReplSummary::default(),
    };

    repl.print("Enter SQL terminated by ';', or .help for commands.")?;
    if let Some(query) = suggestion {
        repl.print(&format!("Try: {};", query))?;
    }

    let mut buffer = String::new();
    repl.prompt(false)?;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if buffer.trim().is_empty() && trimmed.starts_with('.') {
            buffer.clear();
            if let Flow::Quit = repl.meta(trimmed)? {
                return Ok(repl.summary);
            }
        } else {
            buffer.push_str(&line);
            buffer.push('\n');
            if trimmed.ends_with(';') {
                let sql = std::mem::take(&mut buffer);
                repl.submit(sql.trim())?;
            }
        }

        let continuing = !buffer.trim().is_empty();
        repl.prompt(continuing)?;
    }

    if !buffer.trim().is_empty() {
        repl.submit(buffer.trim())?;
    }
    repl.print("")?;
    Ok(repl.summary)
}

impl Execute for ReplCmd {
    type Output = ReplSummary;

    fn execute(self, session: &mut Session) -> Result<Self::Output, Box<dyn Error>> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        run_repl(
            session,
            stdin.lock(),
            stdout.lock(),
            self.format,
            self.suggestion.as_deref(),
        )
    }
}
