//! SQLite file backing the key-value store.
//!
//! One connection per process, guarded by a mutex. The file is opened in WAL
//! mode and migrated to the current `kv_store` schema before it is handed out.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use filepal_core::error::FilepalError;

use crate::migrations;

/// The on-disk state database (`filepal.db` under the data directory).
pub struct Database {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the state file at `path`, creating missing parent
    /// directories and applying pending migrations.
    pub fn open(path: &Path) -> Result<Self, FilepalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            FilepalError::Storage(format!("Cannot open state file {}: {}", path.display(), e))
        })?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 2000;",
        )
        .map_err(|e| FilepalError::Storage(format!("Cannot configure state file: {}", e)))?;
        migrations::run_migrations(&conn)?;

        info!(path = %path.display(), "State database ready");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the connection while holding the lock.
    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T, FilepalError>
    where
        F: FnOnce(&Connection) -> Result<T, FilepalError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| FilepalError::Storage(format!("State database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}
