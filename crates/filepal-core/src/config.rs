use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FilepalError, Result};

/// Top-level configuration for the Filepal application.
///
/// Loaded from `~/.filepal/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilepalConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl FilepalConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FilepalConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FilepalError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory holding the chat database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.filepal/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Assistant conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Simulated round-trip latency before a query is classified.
    pub response_delay_ms: u64,
    /// Delay before a pending action reports completion.
    pub action_delay_ms: u64,
    /// Maximum accepted query length in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: 1000,
            action_delay_ms: 3000,
            max_message_length: 2000,
        }
    }
}

/// File collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Optional JSON seed file; the built-in seed is used when unset.
    pub seed_path: Option<String>,
    /// Files strictly larger than this are compression candidates.
    pub large_file_threshold_bytes: u64,
    /// How many files "recent" queries return.
    pub recent_limit: usize,
    /// How many files "largest" queries return.
    pub largest_limit: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            large_file_threshold_bytes: 5_000_000,
            recent_limit: 5,
            largest_limit: 5,
        }
    }
}

/// Field used to order file listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    #[default]
    Date,
    Size,
    Type,
}

/// Ordering direction for file listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Listing preferences read by the shell only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub sort_by: SortKey,
    pub sort_direction: SortDirection,
    pub show_file_size: bool,
    pub show_file_date: bool,
    pub show_file_path: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sort_by: SortKey::Date,
            sort_direction: SortDirection::Desc,
            show_file_size: true,
            show_file_date: true,
            show_file_path: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = FilepalConfig::default();
        assert_eq!(config.general.data_dir, "~/.filepal/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.response_delay_ms, 1000);
        assert_eq!(config.chat.action_delay_ms, 3000);
        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.files.large_file_threshold_bytes, 5_000_000);
        assert_eq!(config.files.recent_limit, 5);
        assert!(config.files.seed_path.is_none());
        assert_eq!(config.display.sort_by, SortKey::Date);
        assert_eq!(config.display.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/custom/data"
log_level = "debug"

[chat]
response_delay_ms = 10
action_delay_ms = 50

[files]
seed_path = "/tmp/seed.json"

[display]
sort_by = "size"
sort_direction = "asc"
"#;
        let file = create_temp_config(content);
        let config = FilepalConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/custom/data");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.chat.response_delay_ms, 10);
        assert_eq!(config.chat.action_delay_ms, 50);
        // Unspecified field keeps its default.
        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.files.seed_path.as_deref(), Some("/tmp/seed.json"));
        assert_eq!(config.display.sort_by, SortKey::Size);
        assert_eq!(config.display.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = FilepalConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.data_dir, "~/.filepal/data");
        assert_eq!(config.chat.action_delay_ms, 3000);
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[chat\nresponse_delay_ms = ");
        let err = FilepalConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, FilepalError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = FilepalConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, FilepalError::Io(_)));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = FilepalConfig::load_or_default(Path::new("/definitely/not/here.toml"));
        assert_eq!(config.chat.response_delay_ms, 1000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = FilepalConfig::default();
        config.chat.action_delay_ms = 1234;
        config.display.sort_by = SortKey::Name;
        config.save(&path).unwrap();

        let loaded = FilepalConfig::load(&path).unwrap();
        assert_eq!(loaded.chat.action_delay_ms, 1234);
        assert_eq!(loaded.display.sort_by, SortKey::Name);
    }
}
