//! Shared test utilities for session, command, and output tests.
//!
//! Datasets are built from SQL fixtures into real SQLite images, so tests
//! exercise the same open path a fetched file goes through.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rusqlite::Connection;
use tempfile::NamedTempFile;

use crate::db::{EngineError, EngineInit, SqliteEngine, SqliteEngineInit};
use crate::fetch::{DatasetFetcher, FetchError};
use crate::fixtures;
use crate::session::{LoadingStateMachine, Session, SessionStore};

/// Build a database image by running `sql` against a fresh file.
pub fn image_from_sql(sql: &str) -> Vec<u8> {
    let file = NamedTempFile::new().expect("Failed to create temp db file");
    {
        let conn = Connection::open(file.path()).expect("Failed to open temp db");
        conn.execute_batch(sql).expect("Fixture SQL should run");
    }
    std::fs::read(file.path()).expect("Failed to read temp db")
}

/// Image of the play-by-play fixture.
pub fn plays_image() -> Vec<u8> {
    image_from_sql(fixtures::PLAYS)
}

/// Fetcher returning a canned outcome and counting calls.
#[derive(Clone)]
pub struct StaticFetcher {
    outcome: Result<Vec<u8>, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl StaticFetcher {
    pub fn bytes(bytes: Vec<u8>) -> Self {
        Self {
            outcome: Ok(bytes),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn error(err: FetchError) -> Self {
        Self {
            outcome: Err(err),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DatasetFetcher for StaticFetcher {
    async fn fetch(&self, _location: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Engine initializer that always fails.
pub struct FailingInit;

impl EngineInit for FailingInit {
    type Engine = SqliteEngine;

    async fn init(&self) -> Result<SqliteEngine, EngineError> {
        Err(EngineError::Init {
            message: "engine binary unavailable".to_string(),
        })
    }
}

fn block_on<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build test runtime")
        .block_on(future)
}

/// A store in `Ready` over the play-by-play fixture.
///
/// The open database holds its own reference to the engine's scratch
/// directory, so the loader can be dropped here.
pub fn ready_store() -> SessionStore {
    block_on(async {
        let store = SessionStore::new();
        let mut loader = LoadingStateMachine::new(
            store.clone(),
            SqliteEngineInit::new(),
            StaticFetcher::bytes(plays_image()),
        );
        let state = loader.start("pbp_2021.sqlite").await;
        assert!(state.is_ready(), "fixture dataset should load: {:?}", state);
        store
    })
}

/// A session opened over `image`, catalog loaded when the image is valid.
pub fn session_from_image(image: Vec<u8>) -> Session {
    block_on(Session::open(
        SqliteEngineInit::new(),
        StaticFetcher::bytes(image),
        "pbp_2021.sqlite",
    ))
}

/// A ready session over the play-by-play fixture, catalog loaded.
pub fn ready_session() -> Session {
    session_from_image(plays_image())
}
