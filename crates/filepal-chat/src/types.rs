use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filepal_action::PendingAction;
use filepal_core::types::FileRecord;

/// Author of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversation timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_files: Option<Vec<FileRecord>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_loading: bool,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            related_files: None,
            is_loading: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Attach result files; an empty list leaves the message without any.
    pub fn with_files(mut self, files: Vec<FileRecord>) -> Self {
        self.related_files = if files.is_empty() { None } else { Some(files) };
        self
    }

    /// Transient assistant entry shown while a query is being processed.
    pub fn loading() -> Self {
        let mut message = Self::assistant(LOADING_TEXT);
        message.is_loading = true;
        message
    }
}

/// Text of the loading placeholder.
pub const LOADING_TEXT: &str = "...";

/// The canonical first message of every fresh timeline.
pub const GREETING_TEXT: &str = "Merhaba! Ben dosya asistanınızım. Size nasıl yardımcı olabilirim?";

/// Shown in place of a response when classification fails.
pub const ERROR_TEXT: &str = "Üzgünüm, isteğinizi işlerken bir hata oluştu.";

/// Shown when a query produces an action while another is still running.
pub const ACTION_BUSY_TEXT: &str =
    "Devam eden bir işlem var. Yeni işlem başlatmak için lütfen bekleyin.";

/// Result of a successful `submit`.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The final assistant message, or `None` if the timeline was cleared
    /// while the query was being processed.
    pub response: Option<Message>,
    /// The action started by this query, if any.
    pub action: Option<PendingAction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepal_core::types::FileType;

    #[test]
    fn test_loading_placeholder() {
        let m = Message::loading();
        assert!(m.is_loading);
        assert_eq!(m.text, "...");
        assert_eq!(m.sender, Sender::Assistant);
    }

    #[test]
    fn test_with_files_skips_empty() {
        assert!(Message::assistant("x").with_files(vec![]).related_files.is_none());
        let f = FileRecord::new("1", "a.jpg", FileType::Image, 1, Utc::now(), "/a.jpg");
        let m = Message::assistant("x").with_files(vec![f]);
        assert_eq!(m.related_files.unwrap().len(), 1);
    }

    #[test]
    fn test_message_serde_shape() {
        let m = Message::user("selam");
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["sender"], "user");
        assert!(value.get("isLoading").is_none());
        assert!(value.get("relatedFiles").is_none());

        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }
}
