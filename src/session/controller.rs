//! Query session controller: runs user SQL against the ready dataset.
//!
//! After `submit` returns `Ok`, exactly one of (result, error) is set in the
//! snapshot. A submission while the dataset is not `Ready` is a no-op.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::state::{QueryError, QueryState, SessionSnapshot, SessionStore};
use crate::db::ResultSet;

/// Why a submission was not attempted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Dataset is not ready")]
    NotReady,
}

pub struct QuerySessionController {
    store: SessionStore,
}

impl QuerySessionController {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Execute `sql` and record its outcome, replacing the previous one.
    ///
    /// Engine rejections are recorded as `QueryState::HasError` and returned
    /// as `Ok`; only a submission before `Ready` is an `Err`.
    pub fn submit(&mut self, sql: &str) -> Result<QueryState, SubmitError> {
        let Some(db) = self.store.database() else {
            debug!("Submission rejected, dataset not ready");
            return Err(SubmitError::NotReady);
        };

        let outcome = match db.execute(sql) {
            Ok(results) => {
                debug!(
                    statements = results.len(),
                    rows = results.first().map_or(0, ResultSet::row_count),
                    "Query executed"
                );
                let results = if results.is_empty() {
                    vec![ResultSet::empty()]
                } else {
                    results
                };
                QueryState::HasResult(Arc::new(results))
            }
            Err(err) => {
                let err = QueryError::from(err);
                info!(error = %err, "Query rejected by engine");
                QueryState::HasError(err)
            }
        };

        let recorded = outcome.clone();
        let text = sql.to_string();
        self.store.transition(move |current| SessionSnapshot {
            query_text: Some(text),
            query: outcome,
            ..current.clone()
        });
        Ok(recorded)
    }

    /// Record a failure that did not come from a user submission (e.g. the
    /// catalog query) in the same error slot.
    pub(crate) fn record_error(&mut self, err: QueryError) {
        self.store.transition(move |current| SessionSnapshot {
            query: QueryState::HasError(err),
            ..current.clone()
        });
    }

    pub fn state(&self) -> QueryState {
        self.store.snapshot().query
    }

    /// The first result of the last successful submission.
    pub fn current_result(&self) -> Option<ResultSet> {
        self.state().result().cloned()
    }

    pub fn current_error(&self) -> Option<QueryError> {
        self.state().error().cloned()
    }

    pub fn query_text(&self) -> Option<String> {
        self.store.snapshot().query_text
    }
}
