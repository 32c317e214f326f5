use std::error::Error;

use serde::Serialize;

use super::QueryCmd;
use crate::commands::Execute;
use crate::db::ResultSet;
use crate::session::{QueryState, Session};

/// Result of the query command execution
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutput {
    pub query: String,
    pub results: Vec<ResultSet>,
}

impl Execute for QueryCmd {
    type Output = QueryOutput;

    /// A rejected statement is recorded in the session and returned as the
    /// command error.
    fn execute(self, session: &mut Session) -> Result<Self::Output, Box<dyn Error>> {
        match session.submit(&self.sql)? {
            QueryState::HasResult(results) => {
                let results = if self.all {
                    results.to_vec()
                } else {
                    results.iter().take(1).cloned().collect()
                };
                Ok(QueryOutput {
                    query: self.sql,
                    results,
                })
            }
            QueryState::HasError(err) => Err(err.into()),
            QueryState::NoQueryYet => Err("Query produced no outcome".into()),
        }
    }
}
