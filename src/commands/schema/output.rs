//! Output formatting for schema command results.

use super::execute::SchemaOutput;
use crate::output::Outputable;
use crate::schema::TableDescriptor;

fn render_object(object: &TableDescriptor, show_definition: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if object.is_table() {
        lines.push(format!("{} ({} columns)", object.name, object.columns.len()));
        let width = object
            .columns
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);
        for column in &object.columns {
            lines.push(format!(
                "  {:<width$}  {}",
                column.name,
                column.declared_type,
                width = width
            ));
        }
    } else {
        lines.push(format!("{} {} on {}", object.object_type, object.name, object.table_name));
    }

    if show_definition && !object.definition_text.is_empty() {
        lines.push(String::new());
        lines.push(object.definition_text.clone());
    }

    lines
}

impl Outputable for SchemaOutput {
    fn to_table(&self) -> String {
        if let Some(hints) = &self.hints {
            if hints.is_empty() {
                return "No tables found.".to_string();
            }
            return hints
                .iter()
                .map(|(table, columns)| format!("{}: {}", table, columns.join(", ")))
                .collect::<Vec<_>>()
                .join("\n");
        }

        if self.objects.is_empty() {
            return "No tables found.".to_string();
        }

        self.objects
            .iter()
            .map(|object| render_object(object, self.show_definitions).join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
