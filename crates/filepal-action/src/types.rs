use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filepal_core::types::FileRecord;

// =============================================================================
// Enums
// =============================================================================

/// Closed set of simulated multi-step actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateCollage,
    EditPhoto,
    JunkCleaner,
    AnalyzeStorage,
    CompressFiles,
    BackupFiles,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::CreateCollage,
        ActionKind::EditPhoto,
        ActionKind::JunkCleaner,
        ActionKind::AnalyzeStorage,
        ActionKind::CompressFiles,
        ActionKind::BackupFiles,
    ];
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::CreateCollage => write!(f, "create_collage"),
            ActionKind::EditPhoto => write!(f, "edit_photo"),
            ActionKind::JunkCleaner => write!(f, "junk_cleaner"),
            ActionKind::AnalyzeStorage => write!(f, "analyze_storage"),
            ActionKind::CompressFiles => write!(f, "compress_files"),
            ActionKind::BackupFiles => write!(f, "backup_files"),
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_collage" => Ok(ActionKind::CreateCollage),
            "edit_photo" => Ok(ActionKind::EditPhoto),
            "junk_cleaner" => Ok(ActionKind::JunkCleaner),
            "analyze_storage" => Ok(ActionKind::AnalyzeStorage),
            "compress_files" => Ok(ActionKind::CompressFiles),
            "backup_files" => Ok(ActionKind::BackupFiles),
            _ => Err(format!("Unknown action kind: {}", s)),
        }
    }
}

/// Lifecycle of the coordinator's single action slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Idle,
    Pending,
    Completed,
    Discarded,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Idle => write!(f, "idle"),
            ActionStatus::Pending => write!(f, "pending"),
            ActionStatus::Completed => write!(f, "completed"),
            ActionStatus::Discarded => write!(f, "discarded"),
        }
    }
}

/// Arrangement of images in a generated collage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollageLayout {
    Grid,
    Panorama,
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollagePayload {
    pub images: Vec<FileRecord>,
    pub layout: CollageLayout,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPhotoPayload {
    pub image: FileRecord,
    pub available_filters: Vec<String>,
    /// Filter chosen by the user, if any. Completion falls back to a
    /// generic label when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_filter: Option<String>,
}

impl EditPhotoPayload {
    pub const FILTERS: [&'static str; 4] = ["siyah-beyaz", "vintage", "parlak", "kontrast"];

    pub fn for_image(image: FileRecord) -> Self {
        Self {
            image,
            available_filters: Self::FILTERS.iter().map(|f| f.to_string()).collect(),
            applied_filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunkBreakdown {
    pub cache: f64,
    pub temp: f64,
    pub duplicates: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunkCleanerPayload {
    /// Reclaimable space in GB.
    pub potential_space_gb: f64,
    pub breakdown: JunkBreakdown,
}

impl Default for JunkCleanerPayload {
    fn default() -> Self {
        Self {
            potential_space_gb: 1.2,
            breakdown: JunkBreakdown {
                cache: 0.8,
                temp: 0.3,
                duplicates: 0.1,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub images: u32,
    pub videos: u32,
    pub documents: u32,
    pub audio: u32,
    pub archives: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeStoragePayload {
    pub total_files: u32,
    pub counts: TypeCounts,
    pub largest_category: String,
    pub largest_category_mb: u32,
    pub recent_activity: String,
}

impl Default for AnalyzeStoragePayload {
    fn default() -> Self {
        Self {
            total_files: 15,
            counts: TypeCounts {
                images: 3,
                videos: 2,
                documents: 5,
                audio: 2,
                archives: 3,
            },
            largest_category: "videos".to_string(),
            largest_category_mb: 337,
            recent_activity: "documents".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressPayload {
    pub files: Vec<FileRecord>,
    pub compression_ratio: f64,
    pub output_format: String,
}

impl CompressPayload {
    pub fn zip(files: Vec<FileRecord>) -> Self {
        Self {
            files,
            compression_ratio: 0.4,
            output_format: "zip".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub total_files: u32,
    pub total_size_gb: f64,
    pub destination: String,
    pub estimated_minutes: u32,
}

impl Default for BackupPayload {
    fn default() -> Self {
        Self {
            total_files: 15,
            total_size_gb: 1.2,
            destination: "cloud".to_string(),
            estimated_minutes: 10,
        }
    }
}

/// Kind-specific action data. The variant determines the [`ActionKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ActionPayload {
    CreateCollage(CollagePayload),
    EditPhoto(EditPhotoPayload),
    JunkCleaner(JunkCleanerPayload),
    AnalyzeStorage(AnalyzeStoragePayload),
    CompressFiles(CompressPayload),
    BackupFiles(BackupPayload),
}

impl ActionPayload {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionPayload::CreateCollage(_) => ActionKind::CreateCollage,
            ActionPayload::EditPhoto(_) => ActionKind::EditPhoto,
            ActionPayload::JunkCleaner(_) => ActionKind::JunkCleaner,
            ActionPayload::AnalyzeStorage(_) => ActionKind::AnalyzeStorage,
            ActionPayload::CompressFiles(_) => ActionKind::CompressFiles,
            ActionPayload::BackupFiles(_) => ActionKind::BackupFiles,
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// The single in-flight simulated action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub id: Uuid,
    pub payload: ActionPayload,
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn new(payload: ActionPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.payload.kind()
    }
}

/// Result returned by action handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    /// User-facing completion text.
    pub message: String,
}
