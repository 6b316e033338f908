//! Error types for the conversational interface.

use filepal_action::ActionError;
use filepal_core::error::FilepalError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("a message is already being processed")]
    Busy,
    #[error("classification failed: {0}")]
    ClassificationFailed(String),
    #[error("action error: {0}")]
    ActionError(String),
    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<FilepalError> for ChatError {
    fn from(err: FilepalError) -> Self {
        ChatError::StorageError(err.to_string())
    }
}

impl From<ActionError> for ChatError {
    fn from(err: ActionError) -> Self {
        ChatError::ActionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepal_action::ActionKind;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(2000).to_string(),
            "message exceeds maximum length of 2000 characters"
        );
        assert_eq!(
            ChatError::Busy.to_string(),
            "a message is already being processed"
        );
        assert_eq!(
            ChatError::ClassificationFailed("index gone".to_string()).to_string(),
            "classification failed: index gone"
        );
    }

    #[test]
    fn test_from_filepal_error() {
        let err: ChatError = FilepalError::Storage("disk full".to_string()).into();
        assert!(matches!(err, ChatError::StorageError(ref m) if m.contains("disk full")));
    }

    #[test]
    fn test_from_action_error() {
        let err: ChatError = ActionError::AlreadyPending(ActionKind::BackupFiles).into();
        assert!(matches!(err, ChatError::ActionError(ref m) if m.contains("backup_files")));
    }
}
