//! View model: what a presentation layer renders for a session.

use serde::Serialize;

use crate::db::ResultSet;
use crate::output::{render_grid, row_count_footer, Outputable};
use crate::session::{LoadState, SessionSnapshot};

/// Dataset status as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ViewStatus {
    Loading,
    Ready,
    Failed { reason: String },
}

/// A table as listed in a schema browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub column_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub status: ViewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub tables: Vec<TableSummary>,
}

impl SessionView {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let status = match &snapshot.load {
            LoadState::Loading => ViewStatus::Loading,
            LoadState::Ready(_) => ViewStatus::Ready,
            LoadState::LoadFailed(err) => ViewStatus::Failed {
                reason: err.to_string(),
            },
        };

        let tables = snapshot
            .catalog
            .as_deref()
            .map(|catalog| {
                catalog
                    .iter()
                    .filter(|t| t.is_table())
                    .map(|t| TableSummary {
                        name: t.name.clone(),
                        column_count: t.columns.len(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            status,
            query: snapshot.query_text.clone(),
            result: snapshot.query.result().cloned(),
            error: snapshot.query.error().map(|e| e.message.clone()),
            tables,
        }
    }
}

impl Outputable for SessionView {
    fn to_table(&self) -> String {
        match &self.status {
            ViewStatus::Loading => return "Loading...".to_string(),
            ViewStatus::Failed { reason } => return format!("Error: {}", reason),
            ViewStatus::Ready => {}
        }

        let mut lines = Vec::new();

        if let Some(result) = self.result.as_ref().filter(|r| !r.is_empty()) {
            lines.push(render_grid(result, ""));
            lines.push(String::new());
            lines.push(row_count_footer(result.row_count()));
        }

        if let Some(error) = &self.error {
            lines.push(format!("Error: {}", error));
        }

        if let Some(query) = &self.query {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("Showing results for: {}", query));
        }

        lines.join("\n")
    }
}
