//! Action lifecycle for Filepal.
//!
//! Simulated multi-step actions (collage, backup, cleanup, ...) are held in a
//! single pending slot and completed by a pluggable handler once their delay
//! elapses.

pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod types;

pub use error::ActionError;
pub use handler::{ActionHandler, ActionRegistry, GENERIC_COMPLETION};
pub use lifecycle::{ActionCoordinator, CompletionSink};
pub use types::{
    ActionKind, ActionPayload, ActionResult, ActionStatus, AnalyzeStoragePayload, BackupPayload,
    CollageLayout, CollagePayload, CompressPayload, EditPhotoPayload, JunkBreakdown,
    JunkCleanerPayload, PendingAction, TypeCounts,
};
