//! Durable key-value persistence boundary.
//!
//! App state (the chat timeline and its pending action) is serialized to a
//! string and stored under a fixed logical key. Two backends are provided:
//! SQLite for real runs and a plain map for tests and `--in-memory` mode.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusqlite::OptionalExtension;

use filepal_core::error::FilepalError;

use crate::db::Database;

/// A string-valued key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, FilepalError>;

    /// Insert or overwrite the value under `key`.
    fn put(&self, key: &str, value: &str) -> Result<(), FilepalError>;

    /// Remove `key`. Returns whether a value was present.
    fn delete(&self, key: &str) -> Result<bool, FilepalError>;
}

/// SQLite-backed store using the `kv_store` table.
pub struct SqliteKvStore {
    db: Arc<Database>,
}

impl SqliteKvStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, FilepalError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| FilepalError::Storage(format!("Failed to read key {}: {}", key, e)))
        })
    }

    fn put(&self, key: &str, value: &str) -> Result<(), FilepalError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now'))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![key, value],
            )
            .map_err(|e| FilepalError::Storage(format!("Failed to write key {}: {}", key, e)))?;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> Result<bool, FilepalError> {
        self.db.with_conn(|conn| {
            let removed = conn
                .execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key])
                .map_err(|e| {
                    FilepalError::Storage(format!("Failed to delete key {}: {}", key, e))
                })?;
            Ok(removed > 0)
        })
    }
}

/// Volatile store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, FilepalError> {
        self.entries
            .lock()
            .map_err(|e| FilepalError::Storage(format!("Lock poisoned: {}", e)))
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, FilepalError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), FilepalError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, FilepalError> {
        Ok(self.lock()?.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_store() -> (tempfile::TempDir, SqliteKvStore) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("filepal.db")).unwrap();
        (dir, SqliteKvStore::new(Arc::new(db)))
    }

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("chat-storage").unwrap(), None);

        store.put("chat-storage", "{\"v\":1}").unwrap();
        assert_eq!(store.get("chat-storage").unwrap().as_deref(), Some("{\"v\":1}"));

        store.put("chat-storage", "{\"v\":2}").unwrap();
        assert_eq!(store.get("chat-storage").unwrap().as_deref(), Some("{\"v\":2}"));

        assert!(store.delete("chat-storage").unwrap());
        assert!(!store.delete("chat-storage").unwrap());
        assert_eq!(store.get("chat-storage").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_get_put_delete() {
        let (_dir, store) = sqlite_store();
        exercise(&store);
    }

    #[test]
    fn test_memory_store_get_put_delete() {
        exercise(&MemoryKvStore::new());
    }

    #[test]
    fn test_keys_are_independent() {
        let (_dir, store) = sqlite_store();
        store.put("a", "1").unwrap();
        store.put("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filepal.db");
        {
            let store = SqliteKvStore::new(Arc::new(Database::open(&path).unwrap()));
            store.put("chat-storage", "persisted").unwrap();
        }
        let store = SqliteKvStore::new(Arc::new(Database::open(&path).unwrap()));
        assert_eq!(store.get("chat-storage").unwrap().as_deref(), Some("persisted"));
    }
}
