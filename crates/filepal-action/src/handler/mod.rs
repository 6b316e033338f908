//! Action handler registry and trait definition.
//!
//! Each simulated action has a handler that turns its payload into the
//! completion text shown once the action's delay has elapsed.

pub mod analyze_storage;
pub mod backup_files;
pub mod collage;
pub mod compress_files;
pub mod edit_photo;
pub mod junk_cleaner;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use crate::error::ActionError;
use crate::types::{ActionKind, ActionPayload, ActionResult};

/// Completion text used when no handler can describe the outcome.
pub const GENERIC_COMPLETION: &str = "İşlem tamamlandı!";

/// A simulated action implementation.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The action kind this handler serves.
    fn kind(&self) -> ActionKind;

    /// Finish the action and report the completion text.
    async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError>;

    /// Short human-readable summary for logs.
    fn describe(&self, payload: &ActionPayload) -> String;
}

/// Dispatch table from action kind to handler.
pub struct ActionRegistry {
    handlers: HashMap<ActionKind, Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with one handler per built-in action kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(collage::CollageHandler));
        registry.register(Box::new(edit_photo::EditPhotoHandler));
        registry.register(Box::new(junk_cleaner::JunkCleanerHandler));
        registry.register(Box::new(analyze_storage::AnalyzeStorageHandler));
        registry.register(Box::new(compress_files::CompressFilesHandler));
        registry.register(Box::new(backup_files::BackupFilesHandler));
        registry
    }

    /// Register a handler, replacing any previous handler for its kind.
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: ActionKind) -> Option<&dyn ActionHandler> {
        self.handlers.get(&kind).map(|h| h.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler for this payload's kind.
    pub async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError> {
        let kind = payload.kind();
        let handler = self
            .get(kind)
            .ok_or(ActionError::UnregisteredHandler(kind))?;
        handler.execute(payload).await
    }

    /// Completion result that never fails: a missing or failing handler
    /// yields the generic completion text.
    pub async fn complete(&self, payload: &ActionPayload) -> ActionResult {
        match self.execute(payload).await {
            Ok(result) => result,
            Err(e) => {
                warn!(kind = %payload.kind(), error = %e, "Falling back to generic completion");
                ActionResult {
                    success: false,
                    message: GENERIC_COMPLETION.to_string(),
                }
            }
        }
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Payload/kind mismatch error shared by the handlers.
pub(crate) fn wrong_payload(expected: ActionKind, payload: &ActionPayload) -> ActionError {
    ActionError::InvalidPayload(format!(
        "{} handler received {} payload",
        expected,
        payload.kind()
    ))
}
