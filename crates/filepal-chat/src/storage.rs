//! Timeline persistence.
//!
//! The timeline and the pending action are stored together as one JSON
//! document under a fixed key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use filepal_action::PendingAction;
use filepal_storage::KeyValueStore;

use crate::error::ChatError;
use crate::types::Message;

/// Key under which the conversation state is stored.
pub const STORAGE_KEY: &str = "chat-storage";

/// Persisted conversation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub pending_action: Option<PendingAction>,
}

/// Reads and writes [`ChatSnapshot`]s through a key-value store.
#[derive(Clone)]
pub struct ChatStorage {
    store: Arc<dyn KeyValueStore>,
}

impl ChatStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the stored snapshot, if any.
    pub fn load(&self) -> Result<Option<ChatSnapshot>, ChatError> {
        let Some(raw) = self.store.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        let snapshot: ChatSnapshot = serde_json::from_str(&raw)
            .map_err(|e| ChatError::StorageError(format!("corrupt chat state: {}", e)))?;
        debug!(
            messages = snapshot.messages.len(),
            pending = snapshot.pending_action.is_some(),
            "Loaded chat state"
        );
        Ok(Some(snapshot))
    }

    /// Write the snapshot, dropping any loading placeholders.
    pub fn save(&self, snapshot: &ChatSnapshot) -> Result<(), ChatError> {
        let to_write = ChatSnapshot {
            messages: snapshot
                .messages
                .iter()
                .filter(|m| !m.is_loading)
                .cloned()
                .collect(),
            pending_action: snapshot.pending_action.clone(),
        };
        let raw = serde_json::to_string(&to_write)
            .map_err(|e| ChatError::StorageError(format!("failed to encode chat state: {}", e)))?;
        self.store.put(STORAGE_KEY, &raw)?;
        Ok(())
    }

    pub fn erase(&self) -> Result<(), ChatError> {
        self.store.delete(STORAGE_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepal_action::{ActionPayload, BackupPayload};
    use filepal_storage::MemoryKvStore;

    fn storage() -> (ChatStorage, Arc<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (ChatStorage::new(kv.clone()), kv)
    }

    #[test]
    fn test_empty_store_loads_none() {
        let (s, _) = storage();
        assert!(s.load().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_excludes_placeholders() {
        let (s, _) = storage();
        let pending = PendingAction::new(ActionPayload::BackupFiles(BackupPayload::default()));
        let snapshot = ChatSnapshot {
            messages: vec![Message::user("yedekle"), Message::loading()],
            pending_action: Some(pending.clone()),
        };
        s.save(&snapshot).unwrap();

        let loaded = s.load().unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.messages[0].text, "yedekle");
        assert_eq!(loaded.pending_action, Some(pending));
    }

    #[test]
    fn test_uses_fixed_key() {
        let (s, kv) = storage();
        s.save(&ChatSnapshot::default()).unwrap();
        assert!(kv.get("chat-storage").unwrap().is_some());
        s.erase().unwrap();
        assert!(kv.get("chat-storage").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_state_is_storage_error() {
        let (s, kv) = storage();
        kv.put(STORAGE_KEY, "{oops").unwrap();
        assert!(matches!(s.load(), Err(ChatError::StorageError(_))));
    }
}
