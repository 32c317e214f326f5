//! Session state: one immutable snapshot, replaced on every transition.
//!
//! Two orthogonal axes live in the snapshot. `LoadState` gates whether
//! execution is attempted at all; `QueryState` tracks the outcome of the
//! most recent submission. Observers subscribe through a `watch` channel and
//! always see a whole snapshot, never a half-applied transition.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::db::{DatabaseHandle, EngineError, ResultSet};
use crate::fetch::FetchError;
use crate::schema::TableDescriptor;

/// Why a dataset failed to load. Terminal for the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Engine failed to initialize: {0}")]
    EngineInit(EngineError),

    #[error("Dataset fetch failed: {0}")]
    Fetch(FetchError),

    #[error("Dataset could not be opened: {0}")]
    Open(EngineError),
}

/// The engine's rejection of a submitted SQL text, message kept verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
}

impl From<EngineError> for QueryError {
    fn from(err: EngineError) -> Self {
        QueryError {
            message: err.to_string(),
        }
    }
}

/// Loading lifecycle of the session's dataset.
#[derive(Clone)]
pub enum LoadState {
    Loading,
    Ready(Arc<dyn DatabaseHandle>),
    LoadFailed(LoadError),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::LoadFailed(err) => Some(err),
            _ => None,
        }
    }

    /// The live handle, only reachable once `Ready`.
    pub fn database(&self) -> Option<Arc<dyn DatabaseHandle>> {
        match self {
            LoadState::Ready(db) => Some(Arc::clone(db)),
            _ => None,
        }
    }
}

impl fmt::Debug for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Loading => f.write_str("Loading"),
            LoadState::Ready(_) => f.write_str("Ready"),
            LoadState::LoadFailed(err) => f.debug_tuple("LoadFailed").field(err).finish(),
        }
    }
}

/// Outcome of the most recent submission.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    NoQueryYet,
    /// Never empty: an execution without result-bearing statements stores
    /// one empty `ResultSet`.
    HasResult(Arc<Vec<ResultSet>>),
    HasError(QueryError),
}

impl QueryState {
    /// The current result: the first statement's output.
    pub fn result(&self) -> Option<&ResultSet> {
        match self {
            QueryState::HasResult(results) => results.first(),
            _ => None,
        }
    }

    /// Every statement's output, in statement order.
    pub fn results(&self) -> &[ResultSet] {
        match self {
            QueryState::HasResult(results) => results,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            QueryState::HasError(err) => Some(err),
            _ => None,
        }
    }
}

/// Everything an observer of the session can see at one instant.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub load: LoadState,
    pub query_text: Option<String>,
    pub query: QueryState,
    pub catalog: Option<Arc<Vec<TableDescriptor>>>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            query_text: None,
            query: QueryState::NoQueryYet,
            catalog: None,
        }
    }
}

/// Shared owner of the current snapshot.
///
/// Cloning the store shares the same channel; the loader and the controller
/// each hold one.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn load_state(&self) -> LoadState {
        self.tx.borrow().load.clone()
    }

    /// The live handle, if the session is `Ready`.
    pub fn database(&self) -> Option<Arc<dyn DatabaseHandle>> {
        self.tx.borrow().load.database()
    }

    /// Replace the snapshot with `next(current)` in one step and notify observers.
    pub(crate) fn transition(&self, next: impl FnOnce(&SessionSnapshot) -> SessionSnapshot) {
        self.tx.send_modify(|current| {
            let replacement = next(current);
            *current = replacement;
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
