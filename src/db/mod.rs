//! Embedded relational engine contract and its SQLite adapter.
//!
//! This module provides the engine abstraction layer for the session:
//! - Engine initialization (`EngineInit`) and dataset opening (`Engine`)
//! - Statement execution against one loaded dataset (`DatabaseHandle`)
//! - Engine-agnostic result values (`ResultSet`, `CellValue`)
//!
//! # Architecture
//!
//! The session never talks to SQLite directly. It holds an
//! `Arc<dyn DatabaseHandle>` produced by whichever `Engine` the loader was
//! built with, so tests and alternative engines plug in at the trait seam.
//!
//! # Type Decisions
//!
//! **Why no `Blob` cell variant?**
//! A result cell is one of integer, real, text or null. The SQLite adapter
//! renders BLOB cells as lowercase hex text so exports stay plain text.
//!
//! **Why are engine messages stored as `String`?**
//! Load failures and query failures end up in a cloneable session snapshot,
//! and the original engine error types are neither `Clone` nor stable.

mod backend;
mod result_set;
mod sqlite;
mod value;

pub use backend::{DatabaseHandle, Engine, EngineInit};
pub use result_set::ResultSet;
pub use sqlite::{SqliteDatabase, SqliteEngine, SqliteEngineInit, MIN_SQLITE_VERSION, SQLITE_MAGIC};
pub use value::CellValue;

use thiserror::Error;

/// Engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Engine initialization failed: {message}")]
    Init { message: String },

    #[error("Dataset image is malformed: {message}")]
    MalformedImage { message: String },

    #[error("Failed to open dataset image: {message}")]
    Open { message: String },

    /// Raw engine rejection; displayed verbatim so it stays diagnostic.
    #[error("{message}")]
    Execute { message: String },

    #[error("Row {row} has {actual} cells, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl EngineError {
    pub fn execute(err: impl std::fmt::Display) -> Self {
        EngineError::Execute {
            message: err.to_string(),
        }
    }
}
