//! Conversational file assistant for Filepal.
//!
//! Classifies free-text requests against the file repository, keeps the
//! persisted conversation timeline, and hands simulated actions to the
//! action coordinator.

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod storage;
pub mod timeline;
pub mod types;

pub use classifier::{
    classify, detect, ClassifierSettings, CollageSubject, DocumentScope, Intent, IntentResolver,
    PhotoFilter, Recency, Resolution, RuleClassifier,
};
pub use error::ChatError;
pub use orchestrator::{ChatOrchestrator, ChatOrchestratorBuilder};
pub use storage::{ChatSnapshot, ChatStorage, STORAGE_KEY};
pub use timeline::Timeline;
pub use types::{
    Message, Sender, SubmitOutcome, ACTION_BUSY_TEXT, ERROR_TEXT, GREETING_TEXT, LOADING_TEXT,
};
