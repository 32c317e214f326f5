//! Loading state machine: engine init, dataset fetch, image open.
//!
//! `Loading → Ready(handle)` or `Loading → LoadFailed(reason)`. Both terminal
//! states are final; there is no retry. The three steps run strictly in
//! order and the first failure short-circuits the rest, so no partial
//! `Ready` is ever published.

use std::sync::Arc;

use tracing::{info, warn};

use super::state::{LoadError, LoadState, SessionSnapshot, SessionStore};
use crate::db::{DatabaseHandle, Engine, EngineInit};
use crate::fetch::DatasetFetcher;

pub struct LoadingStateMachine<I: EngineInit, F: DatasetFetcher> {
    store: SessionStore,
    init: I,
    fetcher: F,
    engine: Option<I::Engine>,
    started: bool,
}

impl<I: EngineInit, F: DatasetFetcher> LoadingStateMachine<I, F> {
    pub fn new(store: SessionStore, init: I, fetcher: F) -> Self {
        Self {
            store,
            init,
            fetcher,
            engine: None,
            started: false,
        }
    }

    pub fn state(&self) -> LoadState {
        self.store.load_state()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The engine, once initialized. Lives as long as the state machine.
    pub fn engine(&self) -> Option<&I::Engine> {
        self.engine.as_ref()
    }

    /// Give up the state machine, keeping the engine it initialized.
    pub fn into_engine(self) -> Option<I::Engine> {
        self.engine
    }

    /// Drive the session to `Ready` or `LoadFailed`.
    ///
    /// Runs once; later calls leave the state untouched and return it.
    pub async fn start(&mut self, location: &str) -> LoadState {
        if self.started {
            warn!(location, "Dataset load already started, ignoring");
            return self.state();
        }
        self.started = true;

        info!(location, "Loading dataset");
        let next = match self.load(location).await {
            Ok(db) => {
                info!(location, "Dataset ready");
                LoadState::Ready(Arc::from(db))
            }
            Err(err) => {
                warn!(location, error = %err, "Dataset load failed");
                LoadState::LoadFailed(err)
            }
        };

        let published = next.clone();
        self.store.transition(move |current| SessionSnapshot {
            load: next,
            ..current.clone()
        });
        published
    }

    async fn load(&mut self, location: &str) -> Result<Box<dyn DatabaseHandle>, LoadError> {
        let engine = self.init.init().await.map_err(LoadError::EngineInit)?;
        let engine = self.engine.insert(engine);

        let image = self.fetcher.fetch(location).await.map_err(LoadError::Fetch)?;

        engine.open(&image).map_err(LoadError::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{EngineError, SqliteEngineInit};
    use crate::fetch::FetchError;
    use crate::test_utils::{plays_image, FailingInit, StaticFetcher};

    fn machine<I: EngineInit>(init: I, fetcher: StaticFetcher) -> LoadingStateMachine<I, StaticFetcher> {
        LoadingStateMachine::new(SessionStore::new(), init, fetcher)
    }

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let m = machine(SqliteEngineInit::new(), StaticFetcher::bytes(plays_image()));
        assert!(matches!(m.state(), LoadState::Loading));
        assert!(m.engine().is_none());
    }

    #[tokio::test]
    async fn test_start_reaches_ready() {
        let mut m = machine(SqliteEngineInit::new(), StaticFetcher::bytes(plays_image()));
        let state = m.start("pbp_2021.sqlite").await;
        assert!(state.is_ready());
        assert!(m.state().is_ready());
        assert!(m.engine().is_some());
        assert!(m.store().database().is_some());
    }

    #[tokio::test]
    async fn test_engine_init_failure_skips_fetch() {
        let fetcher = StaticFetcher::bytes(plays_image());
        let mut m = machine(FailingInit, fetcher.clone());
        let state = m.start("pbp_2021.sqlite").await;
        assert!(matches!(
            state,
            LoadState::LoadFailed(LoadError::EngineInit(EngineError::Init { .. }))
        ));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let mut m = machine(
            SqliteEngineInit::new(),
            StaticFetcher::error(FetchError::Http {
                location: "http://host/pbp_2021.sqlite".into(),
                status: 404,
            }),
        );
        let state = m.start("http://host/pbp_2021.sqlite").await;
        assert!(matches!(
            state,
            LoadState::LoadFailed(LoadError::Fetch(FetchError::Http { status: 404, .. }))
        ));
        assert!(m.store().database().is_none());
    }

    #[tokio::test]
    async fn test_malformed_image() {
        let mut m = machine(SqliteEngineInit::new(), StaticFetcher::bytes(b"<html>404</html>".to_vec()));
        let state = m.start("pbp_2021.sqlite").await;
        assert!(matches!(
            state,
            LoadState::LoadFailed(LoadError::Open(EngineError::MalformedImage { .. }))
        ));
    }

    #[tokio::test]
    async fn test_terminal_state_is_final() {
        let fetcher = StaticFetcher::error(FetchError::Network {
            location: "x".into(),
            message: "connection refused".into(),
        });
        let mut m = machine(SqliteEngineInit::new(), fetcher.clone());
        let first = m.start("x").await;
        assert!(first.error().is_some());

        let second = m.start("x").await;
        assert!(second.error().is_some());
        assert!(!m.state().is_ready());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_observers_see_single_transition() {
        let mut m = machine(SqliteEngineInit::new(), StaticFetcher::bytes(plays_image()));
        let mut rx = m.store().subscribe();
        m.start("pbp_2021.sqlite").await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().load.is_ready());
        assert!(!rx.has_changed().unwrap());
    }
}
