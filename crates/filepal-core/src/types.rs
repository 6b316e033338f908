use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Kind of file held by the repository.
///
/// The five well-known kinds drive intent resolution; anything else is kept
/// verbatim in `Other` so seed data with unfamiliar types still round-trips.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    Image,
    Video,
    Document,
    Audio,
    Archive,
    /// Open-ended fallback ("unknown" or any unrecognised label).
    Other(String),
}

impl FileType {
    pub fn as_str(&self) -> &str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Document => "document",
            FileType::Audio => "audio",
            FileType::Archive => "archive",
            FileType::Other(label) => label,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "image" => FileType::Image,
            "video" => FileType::Video,
            "document" => FileType::Document,
            "audio" => FileType::Audio,
            "archive" => FileType::Archive,
            other => FileType::Other(other.to_string()),
        })
    }
}

impl From<String> for FileType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<FileType> for String {
    fn from(t: FileType) -> Self {
        t.as_str().to_string()
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// A single file known to the repository.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique within the repository.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// Size in bytes.
    pub size: u64,
    #[serde(with = "flexible_datetime")]
    pub last_modified: DateTime<Utc>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl FileRecord {
    /// Create a record with the required fields; optional fields start empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        file_type: FileType,
        size: u64,
        last_modified: DateTime<Utc>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            file_type,
            size,
            last_modified,
            path: path.into(),
            starred: None,
            category: None,
            thumbnail: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_starred(mut self, starred: bool) -> Self {
        self.starred = Some(starred);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn is_starred(&self) -> bool {
        self.starred.unwrap_or(false)
    }

    /// Category label equality (exact, case-sensitive like the seed labels).
    pub fn in_category(&self, label: &str) -> bool {
        self.category.as_deref() == Some(label)
    }
}

/// Category metadata shown on the browse screen.
///
/// The number of files in a category is never stored here; it is derived
/// from the live file collection on every read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// A category together with its live file count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub count: usize,
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Accepts either epoch milliseconds or an RFC 3339 string, always writes
/// RFC 3339.
pub mod flexible_datetime {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", ms))),
            Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| de::Error::custom(format!("invalid timestamp {:?}: {}", text, e))),
        }
    }
}
