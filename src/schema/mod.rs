//! Schema catalog introspection.
//!
//! The catalog comes from the engine's internal schema table. Its rows are,
//! positionally: object type, object name, owning table, storage location,
//! definition text. Columns are derived from the definition text by
//! [`parse_columns`]; swapping in a structural column query later only
//! touches this module.

mod columns;

pub use columns::{parse_columns, ColumnMetadata, DeclaredType};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::{CellValue, DatabaseHandle};
use crate::session::QueryError;

/// Select every row of SQLite's schema table.
pub const CATALOG_QUERY: &str = "SELECT * FROM sqlite_master";

/// Catalog column positions.
pub struct CatalogRowLayout {
    pub object_type_idx: usize,
    pub name_idx: usize,
    pub table_name_idx: usize,
    pub definition_idx: usize,
}

impl CatalogRowLayout {
    /// `type, name, tbl_name, rootpage, sql`
    pub fn sqlite_master() -> Self {
        Self {
            object_type_idx: 0,
            name_idx: 1,
            table_name_idx: 2,
            definition_idx: 4,
        }
    }
}

/// One catalog entry with its parsed columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub object_type: String,
    pub name: String,
    pub table_name: String,
    pub definition_text: String,
    pub columns: Vec<ColumnMetadata>,
}

impl TableDescriptor {
    /// Build from a definition, parsing its columns.
    pub fn new(
        object_type: impl Into<String>,
        name: impl Into<String>,
        table_name: impl Into<String>,
        definition_text: impl Into<String>,
    ) -> Self {
        let definition_text = definition_text.into();
        let columns = parse_columns(&definition_text);
        Self {
            object_type: object_type.into(),
            name: name.into(),
            table_name: table_name.into(),
            definition_text,
            columns,
        }
    }

    pub fn is_table(&self) -> bool {
        self.object_type == "table"
    }
}

fn text_at(row: &[CellValue], idx: usize) -> String {
    row.get(idx)
        .and_then(CellValue::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Run the catalog query and describe every catalog row, in row order.
///
/// A NULL definition (automatic indexes) gives an empty definition and no
/// columns.
pub fn load_catalog(db: &dyn DatabaseHandle) -> Result<Vec<TableDescriptor>, QueryError> {
    let results = db.execute(CATALOG_QUERY)?;
    let Some(result) = results.first() else {
        return Ok(Vec::new());
    };

    let layout = CatalogRowLayout::sqlite_master();
    Ok(result
        .rows()
        .iter()
        .map(|row| {
            TableDescriptor::new(
                text_at(row, layout.object_type_idx),
                text_at(row, layout.name_idx),
                text_at(row, layout.table_name_idx),
                text_at(row, layout.definition_idx),
            )
        })
        .collect())
}

/// Table name → column names, for tables only.
///
/// This is the shape SQL editors take as their completion schema.
pub fn completion_hints(catalog: &[TableDescriptor]) -> BTreeMap<String, Vec<String>> {
    catalog
        .iter()
        .filter(|t| t.is_table())
        .map(|t| {
            let columns = t.columns.iter().map(|c| c.name.clone()).collect();
            (t.name.clone(), columns)
        })
        .collect()
}
