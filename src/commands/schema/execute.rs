use std::collections::BTreeMap;
use std::error::Error;

use serde::Serialize;

use super::SchemaCmd;
use crate::commands::Execute;
use crate::schema::{completion_hints, TableDescriptor};
use crate::session::{Session, SubmitError};

/// Result of the schema command execution
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<TableDescriptor>,
    /// Set when the definition text should be shown (single-table view)
    #[serde(skip)]
    pub show_definitions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<BTreeMap<String, Vec<String>>>,
}

impl Execute for SchemaCmd {
    type Output = SchemaOutput;

    fn execute(self, session: &mut Session) -> Result<Self::Output, Box<dyn Error>> {
        if !session.is_ready() {
            return Err(SubmitError::NotReady.into());
        }
        let catalog = session.catalog();

        if self.hints {
            return Ok(SchemaOutput {
                hints: Some(completion_hints(&catalog)),
                ..SchemaOutput::default()
            });
        }

        if let Some(table) = &self.table {
            let found = catalog
                .iter()
                .find(|t| t.is_table() && &t.name == table)
                .cloned()
                .ok_or_else(|| format!("No such table: {}", table))?;
            return Ok(SchemaOutput {
                objects: vec![found],
                show_definitions: true,
                hints: None,
            });
        }

        let objects = catalog
            .iter()
            .filter(|t| self.all_objects || t.is_table())
            .cloned()
            .collect();
        Ok(SchemaOutput {
            objects,
            show_definitions: false,
            hints: None,
        })
    }
}
