//! Output formatting for command results.
//!
//! Supports multiple output formats: table (human-readable), JSON, and toon.

use clap::ValueEnum;
use serde::Serialize;

use crate::db::ResultSet;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Token-efficient toon format
    Toon,
}

/// Trait for types that can be formatted for output
pub trait Outputable: Serialize {
    /// Format as a human-readable table
    fn to_table(&self) -> String;

    /// Format according to the specified output format
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Toon => {
                let json_value = serde_json::to_value(self).unwrap_or_default();
                toon::encode(&json_value, None)
            }
        }
    }
}

/// Render a result set as an aligned grid.
///
/// ```text
/// sacks | formation
/// ------+----------
/// 2     | SHOTGUN
/// ```
///
/// NULL cells are shown as `null_text`. Trailing padding is trimmed.
pub fn render_grid(result: &ResultSet, null_text: &str) -> String {
    let rows: Vec<Vec<String>> = result
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_text(null_text)).collect())
        .collect();

    let mut widths: Vec<usize> = result.columns().iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(result.columns()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &rows {
        lines.push(format_line(row.as_slice()));
    }
    lines.join("\n")
}

/// `(1 row)` / `(N rows)`
pub fn row_count_footer(count: usize) -> String {
    if count == 1 {
        "(1 row)".to_string()
    } else {
        format!("({} rows)", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CellValue;
    use rstest::rstest;

    const SACKS_GRID: &str = "\
sacks | formation
------+-------------
2     | SHOTGUN
1     | UNDER CENTER";

    #[rstest]
    fn test_render_grid() {
        let rs = ResultSet::new(
            vec!["sacks".into(), "formation".into()],
            vec![
                vec![CellValue::Integer(2), CellValue::Text("SHOTGUN".into())],
                vec![CellValue::Integer(1), CellValue::Text("UNDER CENTER".into())],
            ],
        )
        .unwrap();
        assert_eq!(render_grid(&rs, ""), SACKS_GRID);
    }

    #[rstest]
    fn test_render_grid_null_text() {
        let rs = ResultSet::new(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Null, CellValue::Integer(10)]],
        )
        .unwrap();
        assert_eq!(render_grid(&rs, "NULL"), "a    | b\n-----+---\nNULL | 10");
    }

    #[rstest]
    fn test_render_grid_header_only() {
        let rs = ResultSet::new(vec!["n".into()], vec![]).unwrap();
        assert_eq!(render_grid(&rs, ""), "n\n-");
    }

    #[rstest]
    #[case(0, "(0 rows)")]
    #[case(1, "(1 row)")]
    #[case(12, "(12 rows)")]
    fn test_row_count_footer(#[case] count: usize, #[case] expected: &str) {
        assert_eq!(row_count_footer(count), expected);
    }
}
