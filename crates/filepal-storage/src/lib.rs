//! Filepal storage crate - file repository and durable key-value persistence.
//!
//! Holds the in-memory file collection with its query surface, seed loading,
//! collection snapshots, and the `KeyValueStore` boundary used to persist app
//! state (WAL-mode SQLite, or an in-memory map for tests).

pub mod db;
pub mod file_store;
pub mod kv;
pub mod migrations;
pub mod repository;
pub mod seed;

pub use db::Database;
pub use file_store::{FileSnapshot, FileStorage, FILE_STORAGE_KEY};
pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use repository::{
    sort_files, CategoryFilter, FileQuery, FileRepository, FileUpdate, QueryOrder, TextMatch,
};
pub use seed::SeedData;
