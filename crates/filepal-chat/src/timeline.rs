//! Conversation timeline.
//!
//! Ordered log of messages. A fresh or cleared timeline holds exactly the
//! greeting. At most one loading placeholder exists at any time.

use uuid::Uuid;

use crate::types::{Message, GREETING_TEXT};

#[derive(Debug, Clone)]
pub struct Timeline {
    messages: Vec<Message>,
    epoch: u64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// A timeline holding only the greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING_TEXT)],
            epoch: 0,
        }
    }

    /// Rebuild from persisted messages. Placeholders are dropped; an empty
    /// list yields the greeting timeline.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let messages: Vec<Message> = messages.into_iter().filter(|m| !m.is_loading).collect();
        if messages.is_empty() {
            return Self::new();
        }
        Self { messages, epoch: 0 }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the message with `id` in place. Returns false if absent.
    pub fn replace(&mut self, id: Uuid, message: Message) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(slot) => {
                *slot = message;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// Reset to the greeting and advance the epoch.
    pub fn clear(&mut self) {
        self.messages = vec![Message::assistant(GREETING_TEXT)];
        self.epoch += 1;
    }

    /// Incremented by every `clear`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn loading_placeholder(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_loading)
    }

    /// Append a loading placeholder, dropping any stale one first.
    pub fn begin_loading(&mut self) -> Uuid {
        self.messages.retain(|m| !m.is_loading);
        let placeholder = Message::loading();
        let id = placeholder.id;
        self.messages.push(placeholder);
        id
    }

    /// Swap the placeholder `loading_id` for the final message.
    ///
    /// The placeholder is removed before the message is appended, so the two
    /// are never present together.
    pub fn finish_loading(&mut self, loading_id: Uuid, message: Message) {
        self.remove(loading_id);
        self.messages.push(message);
    }

    /// Messages worth persisting (everything but the placeholder).
    pub fn persistable(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| !m.is_loading)
            .cloned()
            .collect()
    }
}
