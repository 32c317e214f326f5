//! Delimited-text export of result sets.
//!
//! Output is the column-name line followed by one line per row, cells joined
//! by the column separator and lines by the row separator. There is no
//! quoting or escaping: a cell containing a separator produces output that
//! does not split back into the same shape.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::ResultSet;

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Tab-separated values
    #[default]
    Tsv,
    /// Comma-separated values (unquoted)
    Csv,
}

impl ExportFormat {
    pub fn column_separator(self) -> &'static str {
        match self {
            ExportFormat::Tsv => "\t",
            ExportFormat::Csv => ",",
        }
    }

    pub fn row_separator(self) -> &'static str {
        "\n"
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Tsv => "tsv",
            ExportFormat::Csv => "csv",
        }
    }

    /// The format a `.tsv` / `.csv` extension names, if `path` has one.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(ExportFormat::Csv)
        } else if ext.eq_ignore_ascii_case("tsv") {
            Some(ExportFormat::Tsv)
        } else {
            None
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Text written for NULL cells.
    pub null_text: String,
}

/// Serialize `result` with NULL cells as empty strings.
pub fn serialize(result: &ResultSet, column_separator: &str, row_separator: &str) -> String {
    serialize_cells(result, column_separator, row_separator, "")
}

/// Serialize `result` according to `options`.
pub fn serialize_with(result: &ResultSet, options: &ExportOptions) -> String {
    serialize_cells(
        result,
        options.format.column_separator(),
        options.format.row_separator(),
        &options.null_text,
    )
}

fn serialize_cells(
    result: &ResultSet,
    column_separator: &str,
    row_separator: &str,
    null_text: &str,
) -> String {
    let mut lines = Vec::with_capacity(result.row_count() + 1);
    lines.push(result.columns().join(column_separator));

    for row in result.rows() {
        let cells: Vec<String> = row.iter().map(|cell| cell.to_text(null_text)).collect();
        lines.push(cells.join(column_separator));
    }

    lines.join(row_separator)
}

/// `<stem>.<extension>`
pub fn export_file_name(stem: &str, format: ExportFormat) -> String {
    format!("{}.{}", stem, format.extension())
}

/// Write `result` to `path`, returning the path written.
pub fn write_export(
    path: &Path,
    result: &ResultSet,
    options: &ExportOptions,
) -> Result<PathBuf, Box<dyn Error>> {
    let text = serialize_with(result, options);
    fs::write(path, text.as_bytes())
        .map_err(|e| format!("Failed to write export '{}': {}", path.display(), e))?;
    info!(
        path = %path.display(),
        rows = result.row_count(),
        "Exported result"
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CellValue;
    use rstest::{fixture, rstest};

    #[fixture]
    fn sacks() -> ResultSet {
        ResultSet::new(
            vec!["sacks".into(), "formation".into()],
            vec![
                vec![CellValue::Integer(2), CellValue::Text("SHOTGUN".into())],
                vec![CellValue::Integer(1), CellValue::Null],
            ],
        )
        .unwrap()
    }

    #[rstest]
    fn test_serialize_tsv(sacks: ResultSet) {
        assert_eq!(serialize(&sacks, "\t", "\n"), "sacks\tformation\n2\tSHOTGUN\n1\t");
    }

    #[rstest]
    fn test_serialize_custom_separators(sacks: ResultSet) {
        assert_eq!(serialize(&sacks, ";", "\r\n"), "sacks;formation\r\n2;SHOTGUN\r\n1;");
    }

    #[rstest]
    fn test_serialize_with_null_sentinel(sacks: ResultSet) {
        let options = ExportOptions {
            format: ExportFormat::Csv,
            null_text: "NULL".into(),
        };
        assert_eq!(serialize_with(&sacks, &options), "sacks,formation\n2,SHOTGUN\n1,NULL");
    }

    #[rstest]
    fn test_serialize_is_pure(sacks: ResultSet) {
        let before = sacks.clone();
        let first = serialize(&sacks, "\t", "\n");
        let second = serialize(&sacks, "\t", "\n");
        assert_eq!(first, second);
        assert_eq!(sacks, before);
    }

    #[rstest]
    fn test_no_escaping_of_embedded_separators() {
        let rs = ResultSet::new(
            vec!["note".into()],
            vec![vec![CellValue::Text("a\tb".into())]],
        )
        .unwrap();
        assert_eq!(serialize(&rs, "\t", "\n"), "note\na\tb");
    }

    #[rstest]
    fn test_header_only() {
        let rs = ResultSet::new(vec!["n".into()], vec![]).unwrap();
        assert_eq!(serialize(&rs, "\t", "\n"), "n");
    }

    #[rstest]
    fn test_round_trip_by_splitting(sacks: ResultSet) {
        let text = serialize(&sacks, "\t", "\n");
        let mut lines = text.split('\n');
        let header: Vec<&str> = lines.next().unwrap().split('\t').collect();
        assert_eq!(header, sacks.columns());

        for (line, row) in lines.zip(sacks.rows()) {
            let cells: Vec<&str> = line.split('\t').collect();
            let expected: Vec<String> = row.iter().map(|c| c.to_text("")).collect();
            assert_eq!(cells, expected);
        }
    }

    #[rstest]
    #[case("a.csv", Some(ExportFormat::Csv))]
    #[case("a.Tsv", Some(ExportFormat::Tsv))]
    #[case("a.txt", None)]
    #[case("a", None)]
    fn test_format_from_extension(#[case] path: &str, #[case] expected: Option<ExportFormat>) {
        assert_eq!(ExportFormat::from_extension(Path::new(path)), expected);
    }

    #[rstest]
    fn test_export_file_name() {
        assert_eq!(export_file_name("results", ExportFormat::Tsv), "results.tsv");
        assert_eq!(export_file_name("sacks", ExportFormat::Csv), "sacks.csv");
    }

    #[rstest]
    fn test_write_export(sacks: ResultSet) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let written = write_export(&path, &sacks, &ExportOptions::default()).unwrap();
        assert_eq!(written, path);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "sacks\tformation\n2\tSHOTGUN\n1\t"
        );
    }

    #[rstest]
    fn test_options_deserialize_defaults() {
        let options: ExportOptions = serde_json::from_str(r#"{"format": "csv"}"#).unwrap();
        assert_eq!(options.format, ExportFormat::Csv);
        assert_eq!(options.null_text, "");
    }
}
