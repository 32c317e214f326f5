//! SQLite adapter for the engine traits.
//!
//! Dataset images are materialized into a per-engine scratch directory and
//! opened read-only with `PRAGMA query_only` set, so user SQL can read the
//! dataset but never change it (temp tables included).

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, OpenFlags};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

use super::backend::{DatabaseHandle, Engine, EngineInit};
use super::result_set::ResultSet;
use super::value::CellValue;
use super::EngineError;

/// First 16 bytes of every SQLite database image.
pub const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Size of the fixed database header.
const HEADER_LEN: usize = 100;

/// Oldest SQLite accepted: 3.23 introduced the TRUE/FALSE literals.
pub const MIN_SQLITE_VERSION: i32 = 3_023_000;

/// Bootstrap for the SQLite engine.
///
/// `scratch_parent` chooses where the scratch directory for dataset images
/// is created; the system temp directory is used when unset.
#[derive(Debug, Clone, Default)]
pub struct SqliteEngineInit {
    scratch_parent: Option<PathBuf>,
}

impl SqliteEngineInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scratch_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            scratch_parent: Some(path.into()),
        }
    }
}

impl EngineInit for SqliteEngineInit {
    type Engine = SqliteEngine;

    fn init(&self) -> impl Future<Output = Result<SqliteEngine, EngineError>> + Send {
        let parent = self.scratch_parent.clone();
        async move {
            let version = rusqlite::version_number();
            if version < MIN_SQLITE_VERSION {
                return Err(EngineError::Init {
                    message: format!(
                        "SQLite {} is too old, {} or newer is required",
                        rusqlite::version(),
                        MIN_SQLITE_VERSION
                    ),
                });
            }

            let scratch = tokio::task::spawn_blocking(move || create_scratch_dir(parent.as_deref()))
                .await
                .map_err(|e| EngineError::Init {
                    message: e.to_string(),
                })??;

            info!(
                sqlite_version = rusqlite::version(),
                scratch = %scratch.path().display(),
                "SQLite engine initialized"
            );

            Ok(SqliteEngine {
                scratch: Arc::new(scratch),
            })
        }
    }
}

fn create_scratch_dir(parent: Option<&Path>) -> Result<TempDir, EngineError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("sqlrepl-");
    let dir = match parent {
        Some(parent) => builder.tempdir_in(parent),
        None => builder.tempdir(),
    };
    dir.map_err(|e| EngineError::Init {
        message: format!("cannot create scratch directory: {}", e),
    })
}

/// Initialized SQLite engine.
pub struct SqliteEngine {
    scratch: Arc<TempDir>,
}

impl SqliteEngine {
    /// Directory holding materialized dataset images.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }
}

impl Engine for SqliteEngine {
    fn open(&self, image: &[u8]) -> Result<Box<dyn DatabaseHandle>, EngineError> {
        validate_header(image)?;

        let open_failed = |e: std::io::Error| EngineError::Open {
            message: e.to_string(),
        };
        let mut file = tempfile::Builder::new()
            .prefix("dataset-")
            .suffix(".sqlite")
            .tempfile_in(self.scratch.path())
            .map_err(open_failed)?;
        file.write_all(image).map_err(open_failed)?;
        file.flush().map_err(open_failed)?;

        let conn = Connection::open_with_flags(
            file.path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| EngineError::Open {
            message: e.to_string(),
        })?;
        conn.pragma_update(None, "query_only", true)
            .map_err(|e| EngineError::Open {
                message: e.to_string(),
            })?;

        // SQLite parses the schema lazily; force it so a corrupt image fails here.
        let objects: i64 = conn
            .query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get(0))
            .map_err(|e| EngineError::MalformedImage {
                message: e.to_string(),
            })?;

        debug!(bytes = image.len(), objects, "Dataset image opened");

        Ok(Box::new(SqliteDatabase {
            conn: Mutex::new(conn),
            _image: file,
            _scratch: Arc::clone(&self.scratch),
        }))
    }

    fn engine_name(&self) -> &'static str {
        "sqlite"
    }
}

fn validate_header(image: &[u8]) -> Result<(), EngineError> {
    if image.len() < HEADER_LEN {
        return Err(EngineError::MalformedImage {
            message: format!(
                "image is {} bytes, shorter than the {}-byte header",
                image.len(),
                HEADER_LEN
            ),
        });
    }
    if !image.starts_with(SQLITE_MAGIC) {
        return Err(EngineError::MalformedImage {
            message: "missing SQLite header magic".to_string(),
        });
    }
    Ok(())
}

/// One opened dataset image.
///
/// `rusqlite::Connection` is not `Sync`, so it sits behind a mutex. Field
/// order matters: the connection closes before its backing file is removed.
pub struct SqliteDatabase {
    conn: Mutex<Connection>,
    _image: NamedTempFile,
    _scratch: Arc<TempDir>,
}

impl DatabaseHandle for SqliteDatabase {
    fn execute(&self, sql: &str) -> Result<Vec<ResultSet>, EngineError> {
        let conn = self.conn.lock();
        let mut results = Vec::new();
        let mut batch = Batch::new(&conn, sql);

        while let Some(mut stmt) = batch.next().map_err(engine_error)? {
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();
            let width = columns.len();

            let mut rows = stmt.query([]).map_err(engine_error)?;
            let mut values = Vec::new();
            while let Some(row) = rows.next().map_err(engine_error)? {
                let mut cells = Vec::with_capacity(width);
                for i in 0..width {
                    let value = row.get_ref(i).map_err(engine_error)?;
                    cells.push(cell_from_sqlite(value));
                }
                values.push(cells);
            }

            if width > 0 {
                results.push(ResultSet::new(columns, values)?);
            }
        }

        Ok(results)
    }
}

/// Keep SQLite's own message, without the SQL text rusqlite appends.
fn engine_error(err: rusqlite::Error) -> EngineError {
    match err {
        rusqlite::Error::SqlInputError { msg, .. }
        | rusqlite::Error::SqliteFailure(_, Some(msg)) => EngineError::Execute { message: msg },
        other => EngineError::execute(other),
    }
}

fn cell_from_sqlite(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(f) => CellValue::Real(f),
        ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => CellValue::Text(hex::encode(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{image_from_sql, plays_image};

    async fn open_plays() -> Box<dyn DatabaseHandle> {
        let engine = SqliteEngineInit::new().init().await.unwrap();
        engine.open(&plays_image()).unwrap()
    }

    #[tokio::test]
    async fn test_init_creates_scratch_dir() {
        let parent = tempfile::tempdir().unwrap();
        let engine = SqliteEngineInit::with_scratch_dir(parent.path())
            .init()
            .await
            .unwrap();
        assert!(engine.scratch_dir().starts_with(parent.path()));
        assert!(engine.scratch_dir().is_dir());
        assert_eq!(engine.engine_name(), "sqlite");
    }

    #[tokio::test]
    async fn test_init_fails_for_missing_scratch_parent() {
        let parent = tempfile::tempdir().unwrap();
        let missing = parent.path().join("does/not/exist");
        let err = SqliteEngineInit::with_scratch_dir(missing)
            .init()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::Init { .. }));
    }

    #[tokio::test]
    async fn test_select_count() {
        let db = open_plays().await;
        let results = db
            .execute("select count(*) as n from plays where is_sack = true")
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].columns(), ["n"]);
        assert_eq!(results[0].rows(), [vec![CellValue::Integer(3)]]);
    }

    #[tokio::test]
    async fn test_multi_statement_keeps_order() {
        let db = open_plays().await;
        let results = db.execute("select 1 as a; select 'x' as b, null as c;").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].columns(), ["a"]);
        assert_eq!(results[1].columns(), ["b", "c"]);
        assert_eq!(results[1].rows()[0][1], CellValue::Null);
    }

    #[tokio::test]
    async fn test_zero_row_select_keeps_columns() {
        let db = open_plays().await;
        let results = db.execute("select id from plays where 1 = 0").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].columns(), ["id"]);
        assert_eq!(results[0].row_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_sql_message_is_verbatim() {
        let db = open_plays().await;
        let err = db.execute("select * from missing_table").unwrap_err();
        assert_eq!(err.to_string(), "no such table: missing_table");
    }

    #[tokio::test]
    async fn test_syntax_error_message_is_verbatim() {
        let db = open_plays().await;
        let err = db.execute("select 1 as a; selec x").unwrap_err();
        assert_eq!(err.to_string(), "near \"selec\": syntax error");
    }

    #[tokio::test]
    async fn test_writes_are_rejected() {
        let db = open_plays().await;
        assert!(db.execute("delete from plays").is_err());
        assert!(db.execute("create temp table t(x)").is_err());
        let results = db.execute("select count(*) from plays").unwrap();
        assert_eq!(results[0].rows()[0][0], CellValue::Integer(6));
    }

    #[tokio::test]
    async fn test_blob_cells_render_as_hex() {
        let db = open_plays().await;
        let results = db.execute("select x'00ff10' as b").unwrap();
        assert_eq!(results[0].rows()[0][0], CellValue::Text("00ff10".into()));
    }

    #[tokio::test]
    async fn test_real_cells() {
        let db = open_plays().await;
        let results = db.execute("select avg(yards) as avg_yards from plays").unwrap();
        assert!(matches!(results[0].rows()[0][0], CellValue::Real(_)));
    }

    #[tokio::test]
    async fn test_open_rejects_short_image() {
        let engine = SqliteEngineInit::new().init().await.unwrap();
        let err = engine.open(b"not a database").err().unwrap();
        assert!(matches!(err, EngineError::MalformedImage { .. }));
    }

    #[tokio::test]
    async fn test_open_rejects_missing_magic() {
        let engine = SqliteEngineInit::new().init().await.unwrap();
        let err = engine.open(&[b'x'; 4096]).err().unwrap();
        assert!(matches!(err, EngineError::MalformedImage { .. }));
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_body() {
        let engine = SqliteEngineInit::new().init().await.unwrap();
        let mut image = SQLITE_MAGIC.to_vec();
        image.resize(4096, 0xAB);
        let err = engine.open(&image).err().unwrap();
        assert!(matches!(err, EngineError::MalformedImage { .. }));
    }

    #[tokio::test]
    async fn test_open_empty_schema_image() {
        let engine = SqliteEngineInit::new().init().await.unwrap();
        let image = image_from_sql("PRAGMA user_version = 1;");
        let db = engine.open(&image).unwrap();
        let results = db.execute("select count(*) from sqlite_master").unwrap();
        assert_eq!(results[0].rows()[0][0], CellValue::Integer(0));
    }
}
