//! Tabular query output.

use serde::Serialize;

use super::value::CellValue;
use super::EngineError;

/// One statement's tabular output.
///
/// Every row has exactly `columns.len()` cells; the constructor enforces it
/// and the fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    /// Build a result set, rejecting rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, EngineError> {
        let expected = columns.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(EngineError::ShapeMismatch {
                row,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// A result with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Cell at `(row, column)`, if in range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    fn test_new_accepts_matching_rows() {
        let rs = ResultSet::new(
            cols(&["id", "name"]),
            vec![
                vec![CellValue::Integer(1), CellValue::Text("a".into())],
                vec![CellValue::Integer(2), CellValue::Null],
            ],
        )
        .unwrap();
        assert_eq!(rs.column_count(), 2);
        assert_eq!(rs.row_count(), 2);
        assert_eq!(rs.cell(1, 1), Some(&CellValue::Null));
        assert_eq!(rs.cell(2, 0), None);
    }

    #[rstest]
    fn test_new_rejects_short_row() {
        let err = ResultSet::new(
            cols(&["id", "name"]),
            vec![vec![CellValue::Integer(1), CellValue::Null], vec![CellValue::Integer(2)]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::ShapeMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[rstest]
    fn test_empty() {
        let rs = ResultSet::empty();
        assert!(rs.is_empty());
        assert_eq!(rs.row_count(), 0);
    }

    #[rstest]
    fn test_columns_without_rows_is_not_empty() {
        let rs = ResultSet::new(cols(&["n"]), vec![]).unwrap();
        assert!(!rs.is_empty());
    }

    #[rstest]
    fn test_serialize_shape() {
        let rs = ResultSet::new(cols(&["n"]), vec![vec![CellValue::Integer(3)]]).unwrap();
        assert_eq!(
            serde_json::to_string(&rs).unwrap(),
            r#"{"columns":["n"],"rows":[[3]]}"#
        );
    }
}
