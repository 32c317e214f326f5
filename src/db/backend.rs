//! Engine traits: the three operations the session needs from an embedded engine.
//!
//! `EngineInit::init` produces an `Engine` (asynchronous, may fail),
//! `Engine::open` turns a dataset image into a `DatabaseHandle`, and
//! `DatabaseHandle::execute` runs SQL text. Nothing else of the engine is
//! visible to the rest of the crate.

use std::future::Future;

use super::result_set::ResultSet;
use super::EngineError;

/// Asynchronous engine bootstrap.
///
/// Runs once per session, before any dataset bytes are fetched.
pub trait EngineInit {
    type Engine: Engine + 'static;

    /// Initialize the engine runtime.
    fn init(&self) -> impl Future<Output = Result<Self::Engine, EngineError>> + Send;
}

/// An initialized engine, able to open dataset images.
pub trait Engine: Send + Sync {
    /// Open a serialized database image.
    ///
    /// # Errors
    /// Returns `EngineError::MalformedImage` when the bytes are not an image
    /// this engine understands, `EngineError::Open` for any other failure.
    fn open(&self, image: &[u8]) -> Result<Box<dyn DatabaseHandle>, EngineError>;

    /// Get the engine name for logging/debugging.
    fn engine_name(&self) -> &'static str;
}

/// A live connection to one loaded dataset.
pub trait DatabaseHandle: Send + Sync {
    /// Execute SQL text, which may hold several statements.
    ///
    /// Returns one `ResultSet` per statement that produced result columns,
    /// in statement order. Statements after a failing one are not run.
    fn execute(&self, sql: &str) -> Result<Vec<ResultSet>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_handle_is_object_safe() {
        fn accepts_handle(_db: &dyn DatabaseHandle) {}
        let _ = accepts_handle;
    }

    #[test]
    fn test_engine_is_object_safe() {
        fn accepts_engine(_engine: &dyn Engine) {}
        let _ = accepts_engine;
    }
}
