//! Output formatting for export command results.

use super::execute::ExportResult;
use crate::output::Outputable;

impl Outputable for ExportResult {
    fn to_table(&self) -> String {
        if let Some(content) = &self.content {
            return content.clone();
        }

        let rows = if self.rows == 1 { "row" } else { "rows" };
        match &self.path {
            Some(path) => format!(
                "Exported {} {} x {} columns to {}",
                self.rows,
                rows,
                self.columns,
                path.display()
            ),
            None => format!("Exported {} {}", self.rows, rows),
        }
    }
}
