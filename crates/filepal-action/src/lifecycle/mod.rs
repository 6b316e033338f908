//! Action lifecycle coordination.
//!
//! Owns the single pending-action slot. An action enters the slot through
//! `begin` (or `adopt` when restored from storage), and leaves it either when
//! its scheduled delay elapses (Completed) or when it is discarded.

pub mod state_machine;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use filepal_core::error::FilepalError;

use crate::error::ActionError;
use crate::handler::ActionRegistry;
use crate::lifecycle::state_machine::validate_transition;
use crate::types::{ActionPayload, ActionResult, ActionStatus, PendingAction};

/// Receiver of completion results.
///
/// Called from the coordinator's timer task once an action has left the
/// slot as Completed.
pub trait CompletionSink: Send + Sync {
    fn action_completed(&self, action: &PendingAction, result: ActionResult);
}

struct ActiveAction {
    action: PendingAction,
    token: CancellationToken,
}

struct Slot {
    status: ActionStatus,
    active: Option<ActiveAction>,
}

impl Slot {
    fn transition(&mut self, to: ActionStatus) -> Result<(), ActionError> {
        validate_transition(self.status, to)?;
        self.status = to;
        Ok(())
    }

    fn install(&mut self, action: PendingAction) -> Result<(), ActionError> {
        if let Some(ref current) = self.active {
            return Err(ActionError::AlreadyPending(current.action.kind()));
        }
        self.transition(ActionStatus::Pending)?;
        self.active = Some(ActiveAction {
            action,
            token: CancellationToken::new(),
        });
        Ok(())
    }

    /// Empty the slot through `terminal` and back to Idle.
    fn release(&mut self, terminal: ActionStatus) -> Result<Option<ActiveAction>, ActionError> {
        if self.active.is_none() {
            return Ok(None);
        }
        self.transition(terminal)?;
        let released = self.active.take();
        self.transition(ActionStatus::Idle)?;
        Ok(released)
    }
}

/// Coordinator holding at most one simulated action at a time.
pub struct ActionCoordinator {
    slot: Mutex<Slot>,
    registry: ActionRegistry,
}

impl ActionCoordinator {
    pub fn new(registry: ActionRegistry) -> Self {
        Self {
            slot: Mutex::new(Slot {
                status: ActionStatus::Idle,
                active: None,
            }),
            registry,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slot>, ActionError> {
        self.slot.lock().map_err(|e| {
            ActionError::Storage(FilepalError::Storage(format!("Lock poisoned: {}", e)))
        })
    }

    /// Start a new action (Idle -> Pending).
    ///
    /// Rejected with `AlreadyPending` if another action is in flight; the
    /// pending one is left untouched.
    pub fn begin(&self, payload: ActionPayload) -> Result<PendingAction, ActionError> {
        let action = PendingAction::new(payload);
        self.lock()?.install(action.clone())?;
        info!(action_id = %action.id, kind = %action.kind(), "Action pending");
        Ok(action)
    }

    /// Reinstall an action restored from persistent storage.
    pub fn adopt(&self, action: PendingAction) -> Result<(), ActionError> {
        let (id, kind) = (action.id, action.kind());
        self.lock()?.install(action)?;
        info!(action_id = %id, kind = %kind, "Restored pending action");
        Ok(())
    }

    /// Arrange for the pending action `action_id` to complete after `delay`.
    ///
    /// Returns `None` if that action is no longer pending. The completion
    /// is delivered to `sink` only if the action is still in the slot when
    /// the delay elapses; a discard in the meantime cancels the timer.
    pub fn schedule(
        self: &Arc<Self>,
        action_id: Uuid,
        delay: Duration,
        sink: Arc<dyn CompletionSink>,
    ) -> Result<Option<JoinHandle<()>>, ActionError> {
        let token = {
            let slot = self.lock()?;
            match slot.active {
                Some(ref active) if active.action.id == action_id => active.token.clone(),
                _ => return Ok(None),
            }
        };

        debug!(action_id = %action_id, delay_ms = delay.as_millis() as u64, "Action scheduled");

        let coordinator = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = token.cancelled() => {
                    debug!(action_id = %action_id, "Action timer cancelled");
                    return;
                }
            }

            let action = match coordinator.take_for_completion(action_id) {
                Ok(Some(action)) => action,
                Ok(None) => {
                    debug!(action_id = %action_id, "Action no longer pending; completion dropped");
                    return;
                }
                Err(e) => {
                    warn!(action_id = %action_id, error = %e, "Failed to complete action");
                    return;
                }
            };

            if let Some(handler) = coordinator.registry.get(action.kind()) {
                debug!(action_id = %action_id, "{}", handler.describe(&action.payload));
            }
            let result = coordinator.registry.complete(&action.payload).await;
            info!(
                action_id = %action_id,
                kind = %action.kind(),
                success = result.success,
                "Action completed"
            );
            sink.action_completed(&action, result);
        });

        Ok(Some(handle))
    }

    /// Pending -> Completed -> Idle, only if `action_id` still owns the slot.
    fn take_for_completion(&self, action_id: Uuid) -> Result<Option<PendingAction>, ActionError> {
        let mut slot = self.lock()?;
        match slot.active {
            Some(ref active) if active.action.id == action_id => {}
            _ => return Ok(None),
        }
        Ok(slot
            .release(ActionStatus::Completed)?
            .map(|released| released.action))
    }

    /// Drop the pending action without completing it (Pending -> Discarded).
    ///
    /// Cancels its timer. Returns the discarded action, if there was one.
    pub fn discard(&self) -> Result<Option<PendingAction>, ActionError> {
        let released = self.lock()?.release(ActionStatus::Discarded)?;
        Ok(released.map(|active| {
            active.token.cancel();
            info!(action_id = %active.action.id, kind = %active.action.kind(), "Action discarded");
            active.action
        }))
    }

    /// The action currently in flight, if any.
    pub fn pending(&self) -> Option<PendingAction> {
        self.lock()
            .ok()
            .and_then(|slot| slot.active.as_ref().map(|a| a.action.clone()))
    }

    pub fn status(&self) -> ActionStatus {
        self.lock()
            .map(|slot| slot.status)
            .unwrap_or(ActionStatus::Idle)
    }
}
