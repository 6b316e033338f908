//! In-memory file repository.
//!
//! Holds the authoritative file collection and category metadata, answers
//! compound queries, and tracks which file is currently selected. All reads
//! see every mutation that completed before them.

use std::str::FromStr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use filepal_core::config::{SortDirection, SortKey};
use filepal_core::types::{Category, CategoryView, FileRecord, FileType};

// =============================================================================
// Query model
// =============================================================================

/// A single case-insensitive text criterion, used inside [`FileQuery::any_of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    NameContains(String),
    PathContains(String),
    CategoryIs(String),
    CategoryContains(String),
}

impl TextMatch {
    pub fn name(needle: &str) -> Self {
        TextMatch::NameContains(needle.to_lowercase())
    }

    pub fn path(needle: &str) -> Self {
        TextMatch::PathContains(needle.to_lowercase())
    }

    /// Exact category label match (not lowercased).
    pub fn category(label: &str) -> Self {
        TextMatch::CategoryIs(label.to_string())
    }

    pub fn category_contains(needle: &str) -> Self {
        TextMatch::CategoryContains(needle.to_lowercase())
    }

    fn matches(&self, file: &FileRecord) -> bool {
        match self {
            TextMatch::NameContains(n) => file.name.to_lowercase().contains(n.as_str()),
            TextMatch::PathContains(n) => file.path.to_lowercase().contains(n.as_str()),
            TextMatch::CategoryIs(label) => file.in_category(label),
            TextMatch::CategoryContains(n) => file
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(n.as_str())),
        }
    }
}

/// Result ordering applied before `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrder {
    /// Insertion order.
    Stored,
    /// Most recently modified first.
    NewestFirst,
    /// Biggest size first.
    LargestFirst,
}

/// Compound predicate over file records.
///
/// Every criterion that is set must hold. `any_of` adds a disjunction: at
/// least one of its entries must match (an empty list places no constraint).
#[derive(Debug, Clone)]
pub struct FileQuery {
    file_type: Option<FileType>,
    name_contains: Option<String>,
    path_contains: Option<String>,
    name_suffix: Option<String>,
    category: Option<String>,
    starred: Option<bool>,
    size_above: Option<u64>,
    size_below: Option<u64>,
    modified_after: Option<DateTime<Utc>>,
    modified_before: Option<DateTime<Utc>>,
    any_of: Vec<TextMatch>,
    order: QueryOrder,
    limit: Option<usize>,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl FileQuery {
    /// A query matching every file, in stored order.
    pub fn new() -> Self {
        Self {
            file_type: None,
            name_contains: None,
            path_contains: None,
            name_suffix: None,
            category: None,
            starred: None,
            size_above: None,
            size_below: None,
            modified_after: None,
            modified_before: None,
            any_of: Vec::new(),
            order: QueryOrder::Stored,
            limit: None,
        }
    }

    pub fn of_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    pub fn name_contains(mut self, needle: &str) -> Self {
        self.name_contains = Some(needle.to_lowercase());
        self
    }

    pub fn path_contains(mut self, needle: &str) -> Self {
        self.path_contains = Some(needle.to_lowercase());
        self
    }

    /// Case-insensitive suffix on the file name, e.g. `".apk"`.
    pub fn name_ends_with(mut self, suffix: &str) -> Self {
        self.name_suffix = Some(suffix.to_lowercase());
        self
    }

    pub fn in_category(mut self, label: &str) -> Self {
        self.category = Some(label.to_string());
        self
    }

    pub fn starred(mut self, starred: bool) -> Self {
        self.starred = Some(starred);
        self
    }

    /// Strictly larger than `bytes`.
    pub fn larger_than(mut self, bytes: u64) -> Self {
        self.size_above = Some(bytes);
        self
    }

    /// Strictly smaller than `bytes`.
    pub fn smaller_than(mut self, bytes: u64) -> Self {
        self.size_below = Some(bytes);
        self
    }

    pub fn modified_after(mut self, instant: DateTime<Utc>) -> Self {
        self.modified_after = Some(instant);
        self
    }

    pub fn modified_before(mut self, instant: DateTime<Utc>) -> Self {
        self.modified_before = Some(instant);
        self
    }

    pub fn any_of(mut self, criteria: impl IntoIterator<Item = TextMatch>) -> Self {
        self.any_of.extend(criteria);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = QueryOrder::NewestFirst;
        self
    }

    pub fn largest_first(mut self) -> Self {
        self.order = QueryOrder::LargestFirst;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a single record satisfies the predicate part of the query.
    pub fn matches(&self, file: &FileRecord) -> bool {
        if let Some(ref t) = self.file_type {
            if &file.file_type != t {
                return false;
            }
        }
        if let Some(ref n) = self.name_contains {
            if !file.name.to_lowercase().contains(n.as_str()) {
                return false;
            }
        }
        if let Some(ref n) = self.path_contains {
            if !file.path.to_lowercase().contains(n.as_str()) {
                return false;
            }
        }
        if let Some(ref s) = self.name_suffix {
            if !file.name.to_lowercase().ends_with(s.as_str()) {
                return false;
            }
        }
        if let Some(ref c) = self.category {
            if !file.in_category(c) {
                return false;
            }
        }
        if let Some(s) = self.starred {
            if file.is_starred() != s {
                return false;
            }
        }
        if let Some(min) = self.size_above {
            if file.size <= min {
                return false;
            }
        }
        if let Some(max) = self.size_below {
            if file.size >= max {
                return false;
            }
        }
        if let Some(after) = self.modified_after {
            if file.last_modified <= after {
                return false;
            }
        }
        if let Some(before) = self.modified_before {
            if file.last_modified >= before {
                return false;
            }
        }
        if !self.any_of.is_empty() && !self.any_of.iter().any(|m| m.matches(file)) {
            return false;
        }
        true
    }

    fn apply(&self, files: &[FileRecord]) -> Vec<FileRecord> {
        let mut result: Vec<FileRecord> =
            files.iter().filter(|f| self.matches(f)).cloned().collect();

        // Stable sorts keep insertion order among equal keys.
        match self.order {
            QueryOrder::Stored => {}
            QueryOrder::NewestFirst => {
                result.sort_by(|a, b| b.last_modified.cmp(&a.last_modified))
            }
            QueryOrder::LargestFirst => result.sort_by(|a, b| b.size.cmp(&a.size)),
        }

        if let Some(limit) = self.limit {
            result.truncate(limit);
        }
        result
    }
}

/// Partial update applied by [`FileRepository::update`].
#[derive(Debug, Clone, Default)]
pub struct FileUpdate {
    pub name: Option<String>,
    pub file_type: Option<FileType>,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub path: Option<String>,
    pub starred: Option<bool>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
}

impl FileUpdate {
    fn apply_to(self, file: &mut FileRecord) {
        if let Some(v) = self.name {
            file.name = v;
        }
        if let Some(v) = self.file_type {
            file.file_type = v;
        }
        if let Some(v) = self.size {
            file.size = v;
        }
        if let Some(v) = self.last_modified {
            file.last_modified = v;
        }
        if let Some(v) = self.path {
            file.path = v;
        }
        if let Some(v) = self.starred {
            file.starred = Some(v);
        }
        if let Some(v) = self.category {
            file.category = Some(v);
        }
        if let Some(v) = self.thumbnail {
            file.thumbnail = Some(v);
        }
    }
}

/// Browse filters offered by the categories screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Starred,
    Photos,
    Videos,
    Music,
    Documents,
    /// Files labelled "Downloads".
    Downloads,
    /// Android packages, by `.apk` name suffix.
    Apk,
    /// Any other label, compared against the file's category.
    Named(String),
}

impl CategoryFilter {
    fn query(&self) -> FileQuery {
        match self {
            CategoryFilter::All => FileQuery::new(),
            CategoryFilter::Starred => FileQuery::new().starred(true),
            CategoryFilter::Photos => FileQuery::new().of_type(FileType::Image),
            CategoryFilter::Videos => FileQuery::new().of_type(FileType::Video),
            CategoryFilter::Music => FileQuery::new().of_type(FileType::Audio),
            CategoryFilter::Documents => FileQuery::new().of_type(FileType::Document),
            CategoryFilter::Downloads => FileQuery::new().in_category("Downloads"),
            CategoryFilter::Apk => FileQuery::new().name_ends_with(".apk"),
            CategoryFilter::Named(label) => FileQuery::new().in_category(label),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "All" | "all" => CategoryFilter::All,
            "Starred" | "starred" => CategoryFilter::Starred,
            "photos" => CategoryFilter::Photos,
            "videos" => CategoryFilter::Videos,
            "music" => CategoryFilter::Music,
            "documents" => CategoryFilter::Documents,
            "downloads" => CategoryFilter::Downloads,
            "apk" => CategoryFilter::Apk,
            other => CategoryFilter::Named(other.to_string()),
        })
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(f) => f,
            Err(never) => match never {},
        }
    }
}

/// Order a listing in place by the given display preference.
pub fn sort_files(files: &mut [FileRecord], key: SortKey, direction: SortDirection) {
    files.sort_by(|a, b| {
        let ord = match key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Date => a.last_modified.cmp(&b.last_modified),
            SortKey::Size => a.size.cmp(&b.size),
            SortKey::Type => a.file_type.as_str().cmp(b.file_type.as_str()),
        };
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Default)]
struct RepoState {
    files: Vec<FileRecord>,
    categories: Vec<Category>,
    selected: Option<String>,
}

/// Thread-safe in-memory file collection.
#[derive(Debug, Default)]
pub struct FileRepository {
    state: RwLock<RepoState>,
}

impl FileRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository from seed files and categories.
    ///
    /// Later duplicates of an id replace earlier ones in place.
    pub fn with_seed(files: Vec<FileRecord>, categories: Vec<Category>) -> Self {
        let repo = Self::new();
        repo.replace_all(files);
        repo.write().categories = categories;
        repo
    }

    fn read(&self) -> RwLockReadGuard<'_, RepoState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RepoState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Every file, in insertion order.
    pub fn list(&self) -> Vec<FileRecord> {
        self.read().files.clone()
    }

    pub fn len(&self) -> usize {
        self.read().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().files.is_empty()
    }

    /// Files matching a compound query.
    pub fn filter(&self, query: &FileQuery) -> Vec<FileRecord> {
        query.apply(&self.read().files)
    }

    /// Files matching an arbitrary predicate, in insertion order.
    pub fn filter_by<P>(&self, predicate: P) -> Vec<FileRecord>
    where
        P: Fn(&FileRecord) -> bool,
    {
        self.read()
            .files
            .iter()
            .filter(|f| predicate(f))
            .cloned()
            .collect()
    }

    /// Look up a file by id. A miss is `None`, never an error.
    pub fn by_id(&self, id: &str) -> Option<FileRecord> {
        self.read().files.iter().find(|f| f.id == id).cloned()
    }

    /// Insert a new file or replace the one with the same id in place.
    pub fn upsert(&self, file: FileRecord) {
        let mut state = self.write();
        match state.files.iter_mut().find(|f| f.id == file.id) {
            Some(existing) => {
                debug!(id = %file.id, "Replacing file");
                *existing = file;
            }
            None => {
                debug!(id = %file.id, "Adding file");
                state.files.push(file);
            }
        }
    }

    /// Apply a partial update. Returns the updated record, or `None` if the
    /// id is unknown.
    pub fn update(&self, id: &str, update: FileUpdate) -> Option<FileRecord> {
        let mut state = self.write();
        let file = state.files.iter_mut().find(|f| f.id == id)?;
        update.apply_to(file);
        Some(file.clone())
    }

    /// Remove a file. Clears the selection if it pointed at this file.
    pub fn delete(&self, id: &str) -> Option<FileRecord> {
        let mut state = self.write();
        let pos = state.files.iter().position(|f| f.id == id)?;
        let removed = state.files.remove(pos);
        if state.selected.as_deref() == Some(id) {
            state.selected = None;
            debug!(id, "Deleted file was selected; selection cleared");
        }
        debug!(id, "Deleted file");
        Some(removed)
    }

    /// Flip the starred flag. Returns the new value.
    pub fn toggle_starred(&self, id: &str) -> Option<bool> {
        let mut state = self.write();
        let file = state.files.iter_mut().find(|f| f.id == id)?;
        let starred = !file.is_starred();
        file.starred = Some(starred);
        Some(starred)
    }

    /// Replace the whole collection, keeping the first position of each id.
    pub fn replace_all(&self, files: Vec<FileRecord>) {
        let mut deduped: Vec<FileRecord> = Vec::with_capacity(files.len());
        for file in files {
            match deduped.iter_mut().find(|f| f.id == file.id) {
                Some(existing) => *existing = file,
                None => deduped.push(file),
            }
        }

        let mut state = self.write();
        if let Some(ref sel) = state.selected {
            if !deduped.iter().any(|f| &f.id == sel) {
                state.selected = None;
            }
        }
        state.files = deduped;
    }

    /// The `limit` most recently modified files.
    pub fn recent(&self, limit: usize) -> Vec<FileRecord> {
        self.filter(&FileQuery::new().newest_first().limit(limit))
    }

    /// The `limit` biggest files.
    pub fn largest(&self, limit: usize) -> Vec<FileRecord> {
        self.filter(&FileQuery::new().largest_first().limit(limit))
    }

    /// Free-text search over name, category and type. A blank query matches
    /// everything.
    pub fn search(&self, text: &str) -> Vec<FileRecord> {
        if text.trim().is_empty() {
            return self.list();
        }
        let needle = text.to_lowercase();
        self.filter_by(|f| {
            f.name.to_lowercase().contains(&needle)
                || f
                    .category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
                || f.file_type.as_str().to_lowercase().contains(&needle)
        })
    }

    /// Files shown for a browse filter.
    pub fn files_in_category(&self, filter: &CategoryFilter) -> Vec<FileRecord> {
        self.filter(&filter.query())
    }

    /// Category metadata with counts computed from the current collection.
    pub fn categories(&self) -> Vec<CategoryView> {
        let state = self.read();
        state
            .categories
            .iter()
            .map(|c| {
                let query = CategoryFilter::from(c.id.as_str()).query();
                CategoryView {
                    category: c.clone(),
                    count: state.files.iter().filter(|f| query.matches(f)).count(),
                }
            })
            .collect()
    }

    /// Category metadata as stored, without counts.
    pub fn category_list(&self) -> Vec<Category> {
        self.read().categories.clone()
    }

    /// Mark a file as the current selection. Returns false for unknown ids.
    pub fn select(&self, id: &str) -> bool {
        let mut state = self.write();
        if state.files.iter().any(|f| f.id == id) {
            state.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<FileRecord> {
        let state = self.read();
        let id = state.selected.as_deref()?;
        state.files.iter().find(|f| f.id == id).cloned()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.read().selected.clone()
    }

    pub fn clear_selection(&self) {
        self.write().selected = None;
    }
}
