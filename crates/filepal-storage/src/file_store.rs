//! File collection persistence.
//!
//! The whole collection (files, categories and the selected file) is written
//! as one JSON document under [`FILE_STORAGE_KEY`] after every mutation and
//! restored over the seed on the next start.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use filepal_core::error::FilepalError;
use filepal_core::types::{Category, FileRecord};

use crate::kv::KeyValueStore;
use crate::repository::FileRepository;

/// Key under which the file collection is stored.
pub const FILE_STORAGE_KEY: &str = "file-storage";

/// Persisted file collection state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSnapshot {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_file: Option<String>,
}

impl FileSnapshot {
    pub fn capture(repo: &FileRepository) -> Self {
        Self {
            files: repo.list(),
            categories: repo.category_list(),
            selected_file: repo.selected_id(),
        }
    }

    /// Rebuild a repository. A selection pointing at a missing file is dropped.
    pub fn into_repository(self) -> FileRepository {
        let repo = FileRepository::with_seed(self.files, self.categories);
        if let Some(id) = self.selected_file {
            if !repo.select(&id) {
                debug!(id = %id, "Stored selection no longer exists");
            }
        }
        repo
    }
}

/// Reads and writes [`FileSnapshot`]s through a key-value store.
#[derive(Clone)]
pub struct FileStorage {
    store: Arc<dyn KeyValueStore>,
}

impl FileStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Result<Option<FileSnapshot>, FilepalError> {
        let Some(raw) = self.store.get(FILE_STORAGE_KEY)? else {
            return Ok(None);
        };
        let snapshot: FileSnapshot = serde_json::from_str(&raw)?;
        debug!(
            files = snapshot.files.len(),
            categories = snapshot.categories.len(),
            "Loaded file state"
        );
        Ok(Some(snapshot))
    }

    pub fn save(&self, repo: &FileRepository) -> Result<(), FilepalError> {
        let raw = serde_json::to_string(&FileSnapshot::capture(repo))?;
        self.store.put(FILE_STORAGE_KEY, &raw)
    }

    /// Forget the stored collection. Returns whether one was present.
    pub fn erase(&self) -> Result<bool, FilepalError> {
        self.store.delete(FILE_STORAGE_KEY)
    }
}
