//! Chat orchestrator: wires the timeline, classifier and action coordinator.
//!
//! `submit` appends the user's message, shows a loading placeholder while
//! the simulated response latency elapses, swaps in the classified answer
//! and, when the answer carries an action, hands it to the coordinator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use filepal_action::{
    ActionCoordinator, ActionError, ActionRegistry, ActionResult, CompletionSink, PendingAction,
};
use filepal_core::config::ChatConfig;
use filepal_storage::FileRepository;

use crate::classifier::{IntentResolver, RuleClassifier};
use crate::error::ChatError;
use crate::storage::{ChatSnapshot, ChatStorage};
use crate::timeline::Timeline;
use crate::types::{Message, SubmitOutcome, ACTION_BUSY_TEXT, ERROR_TEXT};

struct Inner {
    repo: Arc<FileRepository>,
    timeline: Mutex<Timeline>,
    coordinator: Arc<ActionCoordinator>,
    resolver: Arc<dyn IntentResolver>,
    storage: Option<ChatStorage>,
    processing: AtomicBool,
    config: ChatConfig,
}

impl Inner {
    fn timeline(&self) -> Result<MutexGuard<'_, Timeline>, ChatError> {
        self.timeline
            .lock()
            .map_err(|e| ChatError::StorageError(format!("timeline lock poisoned: {}", e)))
    }

    /// Write the current state. Failures are logged, never surfaced.
    fn persist(&self, timeline: &Timeline) {
        let Some(ref storage) = self.storage else {
            return;
        };
        let snapshot = ChatSnapshot {
            messages: timeline.persistable(),
            pending_action: self.coordinator.pending(),
        };
        if let Err(e) = storage.save(&snapshot) {
            warn!(error = %e, "Failed to persist chat state");
        }
    }

    fn schedule(self: &Arc<Self>, action: &PendingAction, epoch: u64) {
        let sink = Arc::new(TimelineSink {
            inner: Arc::clone(self),
            epoch,
        });
        let delay = Duration::from_millis(self.config.action_delay_ms);
        match self.coordinator.schedule(action.id, delay, sink) {
            Ok(Some(_)) => {}
            Ok(None) => debug!(action_id = %action.id, "Action left the slot before scheduling"),
            Err(e) => warn!(action_id = %action.id, error = %e, "Failed to schedule action"),
        }
    }
}

/// Appends completion messages to the timeline they were started from.
struct TimelineSink {
    inner: Arc<Inner>,
    epoch: u64,
}

impl CompletionSink for TimelineSink {
    fn action_completed(&self, action: &PendingAction, result: ActionResult) {
        let mut timeline = match self.inner.timeline() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Dropping action completion");
                return;
            }
        };
        if timeline.epoch() != self.epoch {
            debug!(action_id = %action.id, "Timeline cleared; completion dropped");
            return;
        }
        timeline.append(Message::assistant(result.message));
        self.inner.persist(&timeline);
    }
}

/// Resets the processing flag on every exit path of `submit`.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Builder for [`ChatOrchestrator`].
pub struct ChatOrchestratorBuilder {
    repo: Arc<FileRepository>,
    config: ChatConfig,
    storage: Option<ChatStorage>,
    resolver: Option<Arc<dyn IntentResolver>>,
    registry: Option<ActionRegistry>,
}

impl ChatOrchestratorBuilder {
    pub fn config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage(mut self, storage: ChatStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn IntentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> ChatOrchestrator {
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(RuleClassifier::default()));
        let registry = self.registry.unwrap_or_else(ActionRegistry::with_defaults);

        ChatOrchestrator {
            inner: Arc::new(Inner {
                repo: self.repo,
                timeline: Mutex::new(Timeline::new()),
                coordinator: Arc::new(ActionCoordinator::new(registry)),
                resolver,
                storage: self.storage,
                processing: AtomicBool::new(false),
                config: self.config,
            }),
        }
    }
}

/// Conversation service. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ChatOrchestrator {
    inner: Arc<Inner>,
}

impl ChatOrchestrator {
    pub fn builder(repo: Arc<FileRepository>) -> ChatOrchestratorBuilder {
        ChatOrchestratorBuilder {
            repo,
            config: ChatConfig::default(),
            storage: None,
            resolver: None,
            registry: None,
        }
    }

    /// Orchestrator with default classifier, handlers and no persistence.
    pub fn new(repo: Arc<FileRepository>, config: ChatConfig) -> Self {
        Self::builder(repo).config(config).build()
    }

    /// Load persisted state and resume a pending action with its full delay.
    ///
    /// Must run inside a Tokio runtime when an action is restored.
    pub fn restore(&self) -> Result<(), ChatError> {
        let Some(ref storage) = self.inner.storage else {
            return Ok(());
        };
        let Some(snapshot) = storage.load()? else {
            debug!("No persisted chat state");
            return Ok(());
        };

        let mut timeline = self.inner.timeline()?;
        *timeline = Timeline::from_messages(snapshot.messages);
        info!(messages = timeline.len(), "Restored chat timeline");

        if let Some(action) = snapshot.pending_action {
            self.inner.coordinator.adopt(action.clone())?;
            self.inner.schedule(&action, timeline.epoch());
        }
        Ok(())
    }

    /// Process one user query end to end.
    ///
    /// Rejects empty or over-long queries and any query submitted while
    /// another is still being processed; rejected calls leave the timeline
    /// untouched.
    pub async fn submit(&self, query: &str) -> Result<SubmitOutcome, ChatError> {
        let text = query.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let max = self.inner.config.max_message_length;
        if text.chars().count() > max {
            return Err(ChatError::MessageTooLong(max));
        }

        if self
            .inner
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ChatError::Busy);
        }
        let guard = ProcessingGuard(&self.inner.processing);

        let (loading_id, epoch) = {
            let mut timeline = self.inner.timeline()?;
            timeline.append(Message::user(text));
            let id = timeline.begin_loading();
            self.inner.persist(&timeline);
            (id, timeline.epoch())
        };

        tokio::time::sleep(Duration::from_millis(self.inner.config.response_delay_ms)).await;

        let resolution = self.inner.resolver.resolve(text, &self.inner.repo);

        let mut timeline = self.inner.timeline()?;
        if timeline.epoch() != epoch {
            debug!("Timeline cleared while processing; result discarded");
            return Ok(SubmitOutcome {
                response: None,
                action: None,
            });
        }

        let (response, payload) = match resolution {
            Ok(resolution) => {
                debug!(
                    intent = ?resolution.intent,
                    files = resolution.files.len(),
                    "Query classified"
                );
                let message =
                    Message::assistant(resolution.response_text).with_files(resolution.files);
                (message, resolution.action)
            }
            Err(e) => {
                warn!(error = %e, "Classification failed");
                (Message::assistant(ERROR_TEXT), None)
            }
        };
        timeline.finish_loading(loading_id, response.clone());
        drop(guard);

        let mut started = None;
        if let Some(payload) = payload {
            match self.inner.coordinator.begin(payload) {
                Ok(action) => {
                    self.inner.schedule(&action, epoch);
                    started = Some(action);
                }
                Err(ActionError::AlreadyPending(kind)) => {
                    info!(pending = %kind, "Action rejected; another is pending");
                    timeline.append(Message::assistant(ACTION_BUSY_TEXT));
                }
                Err(e) => warn!(error = %e, "Failed to start action"),
            }
        }
        self.inner.persist(&timeline);

        Ok(SubmitOutcome {
            response: Some(response),
            action: started,
        })
    }

    /// Reset the timeline to the greeting and discard any pending action.
    pub fn clear_messages(&self) -> Result<(), ChatError> {
        let mut timeline = self.inner.timeline()?;
        self.inner.coordinator.discard()?;
        timeline.clear();
        self.inner.persist(&timeline);
        info!("Chat cleared");
        Ok(())
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .timeline()
            .map(|t| t.messages().to_vec())
            .unwrap_or_default()
    }

    pub fn is_processing(&self) -> bool {
        self.inner.processing.load(Ordering::SeqCst)
    }

    pub fn pending_action(&self) -> Option<PendingAction> {
        self.inner.coordinator.pending()
    }

    pub fn repository(&self) -> Arc<FileRepository> {
        Arc::clone(&self.inner.repo)
    }
}
