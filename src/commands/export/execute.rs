use std::error::Error;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::ExportCmd;
use crate::commands::Execute;
use crate::export::{export_file_name, serialize_with, write_export, ExportFormat, ExportOptions};
use crate::session::{QueryState, Session};

/// Result of the export command execution
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub rows: usize,
    pub columns: usize,
    /// File written, when exporting to a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Exported text, when exporting to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ExportCmd {
    /// Session defaults overridden by the command's flags.
    fn options(&self, defaults: &ExportOptions, target: &Path) -> ExportOptions {
        let format = self
            .export_format
            .or_else(|| ExportFormat::from_extension(target))
            .unwrap_or(defaults.format);
        ExportOptions {
            format,
            null_text: self
                .null_text
                .clone()
                .unwrap_or_else(|| defaults.null_text.clone()),
        }
    }

    /// A file named `.csv` or `.tsv` must hold that format.
    fn check_target(&self, target: &Path) -> Result<(), Box<dyn Error>> {
        if self.stdout {
            return Ok(());
        }
        match (self.export_format, ExportFormat::from_extension(target)) {
            (Some(flag), Some(named)) if flag != named => Err(format!(
                "--export-format {} conflicts with the .{} extension of '{}'",
                flag.extension(),
                named.extension(),
                target.display()
            )
            .into()),
            _ => Ok(()),
        }
    }
}

impl Execute for ExportCmd {
    type Output = ExportResult;

    fn execute(self, session: &mut Session) -> Result<Self::Output, Box<dyn Error>> {
        let target = PathBuf::from(&self.output);
        self.check_target(&target)?;

        let result = match session.submit(&self.sql)? {
            QueryState::HasResult(_) => session
                .current_result()
                .ok_or("Query produced no result to export")?,
            QueryState::HasError(err) => return Err(err.into()),
            QueryState::NoQueryYet => return Err("Query produced no outcome".into()),
        };

        let options = self.options(session.export_options(), &target);

        let (path, content) = if self.stdout {
            (None, Some(serialize_with(&result, &options)))
        } else {
            let path = if ExportFormat::from_extension(&target).is_some() {
                target
            } else {
                PathBuf::from(export_file_name(&self.output, options.format))
            };
            (Some(write_export(&path, &result, &options)?), None)
        };

        Ok(ExportResult {
            format: options.format,
            rows: result.row_count(),
            columns: result.column_count(),
            path,
            content,
        })
    }
}
