//! Output formatting for query command results.

use super::execute::QueryOutput;
use crate::db::ResultSet;
use crate::output::{render_grid, row_count_footer, Outputable};

fn render_result(result: &ResultSet) -> String {
    if result.column_count() == 0 {
        return "Statement returned no columns.".to_string();
    }
    format!(
        "{}\n\n{}",
        render_grid(result, ""),
        row_count_footer(result.row_count())
    )
}

impl Outputable for QueryOutput {
    fn to_table(&self) -> String {
        let mut blocks: Vec<String> = self.results.iter().map(render_result).collect();
        blocks.push(format!("Showing results for: {}", self.query));
        blocks.join("\n\n")
    }
}
