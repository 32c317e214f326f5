//! Output formatting for repl command results.

use super::execute::ReplSummary;
use crate::output::Outputable;

impl Outputable for ReplSummary {
    fn to_table(&self) -> String {
        let noun = if self.submitted == 1 { "query" } else { "queries" };
        format!("{} {} submitted, {} failed", self.submitted, noun, self.failed)
    }
}
