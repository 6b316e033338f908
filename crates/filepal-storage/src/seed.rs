//! Seed data loading.
//!
//! The repository is populated once at startup from a JSON document of the
//! shape `{ "files": [...], "categories": [...] }`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use filepal_core::error::FilepalError;
use filepal_core::types::{Category, FileRecord};

use crate::repository::FileRepository;

/// Static input collection for a [`FileRepository`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, FilepalError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, FilepalError> {
        let content = std::fs::read_to_string(path)?;
        let seed = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            files = seed.files.len(),
            categories = seed.categories.len(),
            "Loaded seed data"
        );
        Ok(seed)
    }

    /// Build a repository holding this seed.
    pub fn into_repository(self) -> FileRepository {
        FileRepository::with_seed(self.files, self.categories)
    }
}
