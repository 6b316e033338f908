use thiserror::Error;

/// Top-level error type for the Filepal system.
///
/// Subsystem crates define their own error types and implement
/// `From<FilepalError>` for them so that the `?` operator works across
/// crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FilepalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Shutdown in progress")]
    ShuttingDown,
}

impl From<toml::de::Error> for FilepalError {
    fn from(err: toml::de::Error) -> Self {
        FilepalError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for FilepalError {
    fn from(err: toml::ser::Error) -> Self {
        FilepalError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FilepalError {
    fn from(err: serde_json::Error) -> Self {
        FilepalError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Filepal operations.
pub type Result<T> = std::result::Result<T, FilepalError>;
