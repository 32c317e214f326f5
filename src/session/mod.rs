//! Session orchestration.
//!
//! - `state`: the snapshot model and the store observers subscribe to
//! - `loader`: engine init → dataset fetch → image open
//! - `controller`: SQL submission and outcome tracking
//!
//! `Session` ties them together with the schema catalog and the export
//! defaults the commands need.

mod controller;
mod loader;
mod state;

pub use controller::{QuerySessionController, SubmitError};
pub use loader::LoadingStateMachine;
pub use state::{LoadError, LoadState, QueryError, QueryState, SessionSnapshot, SessionStore};

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::db::{Engine, EngineInit, ResultSet};
use crate::export::ExportOptions;
use crate::fetch::DatasetFetcher;
use crate::schema::{self, TableDescriptor};
use crate::view::SessionView;

/// One user session over one dataset.
pub struct Session {
    store: SessionStore,
    controller: QuerySessionController,
    export: ExportOptions,
    engine: Option<Box<dyn Engine>>,
}

impl Session {
    /// Attach to a store whose load state is driven elsewhere.
    pub fn new(store: SessionStore) -> Self {
        let controller = QuerySessionController::new(store.clone());
        Self {
            store,
            controller,
            export: ExportOptions::default(),
            engine: None,
        }
    }

    /// Load `location` and, once ready, the schema catalog.
    ///
    /// Always returns a session; a load failure is recorded in its state.
    pub async fn open<I, F>(init: I, fetcher: F, location: &str) -> Self
    where
        I: EngineInit,
        F: DatasetFetcher,
    {
        let store = SessionStore::new();
        let mut loader = LoadingStateMachine::new(store.clone(), init, fetcher);
        loader.start(location).await;

        let mut session = Self::new(store);
        session.engine = loader
            .into_engine()
            .map(|engine| Box::new(engine) as Box<dyn Engine>);
        if session.is_ready() {
            session.load_catalog();
        }
        session
    }

    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export = options;
        self
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.export
    }

    /// Name of the engine the dataset was loaded with.
    pub fn engine_name(&self) -> Option<&'static str> {
        self.engine.as_ref().map(|engine| engine.engine_name())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.store.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.store.load_state().is_ready()
    }

    /// `Ok` once ready, the load failure otherwise.
    pub fn require_ready(&self) -> Result<(), LoadError> {
        match self.store.load_state() {
            LoadState::LoadFailed(err) => Err(err),
            _ => Ok(()),
        }
    }

    pub fn submit(&mut self, sql: &str) -> Result<QueryState, SubmitError> {
        self.controller.submit(sql)
    }

    pub fn current_result(&self) -> Option<ResultSet> {
        self.controller.current_result()
    }

    /// Run the catalog query and publish the parsed catalog.
    ///
    /// A failing catalog query lands in the query error slot and leaves an
    /// empty catalog; query execution stays available.
    pub fn load_catalog(&mut self) -> Arc<Vec<TableDescriptor>> {
        let Some(db) = self.store.database() else {
            return Arc::new(Vec::new());
        };

        let catalog = match schema::load_catalog(db.as_ref()) {
            Ok(tables) => Arc::new(tables),
            Err(err) => {
                warn!(error = %err, "Catalog query failed");
                self.controller.record_error(err);
                Arc::new(Vec::new())
            }
        };

        let published = Arc::clone(&catalog);
        self.store.transition(move |current| SessionSnapshot {
            catalog: Some(published),
            ..current.clone()
        });
        catalog
    }

    pub fn catalog(&self) -> Arc<Vec<TableDescriptor>> {
        self.snapshot().catalog.unwrap_or_default()
    }

    pub fn view(&self) -> SessionView {
        SessionView::from_snapshot(&self.snapshot())
    }
}
