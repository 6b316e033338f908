//! Error types for the action lifecycle.

use crate::types::{ActionKind, ActionStatus};
use filepal_core::error::FilepalError;

/// Errors from the coordinator and action handlers.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("An action is already pending: {0}")]
    AlreadyPending(ActionKind),
    #[error("Invalid state transition: {0} -> {1}")]
    InvalidTransition(ActionStatus, ActionStatus),
    #[error("Action handler failed: {0}")]
    HandlerFailed(String),
    #[error("Action kind not registered: {0}")]
    UnregisteredHandler(ActionKind),
    #[error("Payload validation failed: {0}")]
    InvalidPayload(String),
    #[error("Storage error: {0}")]
    Storage(#[from] FilepalError),
}
