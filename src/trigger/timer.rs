//! Timer-service boundary and the in-process tokio implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::core::types::{EpochMillis, TriggerKind, TriggerSlot, now_ms};
use crate::trigger::handler::TriggerHandler;

/// Errors from trigger registration.
#[derive(Debug, Error)]
pub enum TimerError {
    /// The platform rejected the trigger registration.
    #[error("trigger registration failed: {0}")]
    RegistrationFailed(String),
}

/// Deferred-trigger delivery service.
///
/// Contract assumed of implementations (the platform alarm service in
/// production, [`TokioTimer`] in-process):
///
/// - exact delivery: the trigger fires at or shortly after
///   `fire_at_ms`, including waking the device from low-power idle;
/// - at-least-once: redelivery is possible and the handler tolerates it;
/// - slot overwrite: registering into an occupied slot replaces the
///   pending registration, so at most one trigger is outstanding per
///   slot;
/// - past deadlines fire immediately.
///
/// A registration failure must surface as an error; the caller never
/// gets to believe scheduling succeeded when it did not.
#[async_trait]
pub trait TimerService: Send + Sync {
    /// Register a trigger to fire at `fire_at_ms` in the given slot.
    async fn register(
        &self,
        slot: TriggerSlot,
        kind: TriggerKind,
        fire_at_ms: EpochMillis,
    ) -> Result<(), TimerError>;

    /// Cancel every pending registration.
    async fn cancel_all(&self);
}

/// In-process timer backed by tokio tasks, one per slot.
///
/// Each registration spawns a task that sleeps until the deadline and
/// then invokes the handler; registering into an occupied slot aborts
/// the previous task. Dropping the timer aborts everything pending, so
/// fired-after-teardown cannot happen in-process.
pub struct TokioTimer {
    handler: TriggerHandler,
    pending: Mutex<HashMap<TriggerSlot, JoinHandle<()>>>,
}

impl TokioTimer {
    /// Create a timer that delivers into the given handler.
    pub fn new(handler: TriggerHandler) -> Self {
        Self {
            handler,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Number of registrations that have not fired yet.
    pub fn pending_count(&self) -> usize {
        let mut pending = self.lock_pending();
        pending.retain(|_, task| !task.is_finished());
        pending.len()
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<TriggerSlot, JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TimerService for TokioTimer {
    async fn register(
        &self,
        slot: TriggerSlot,
        kind: TriggerKind,
        fire_at_ms: EpochMillis,
    ) -> Result<(), TimerError> {
        if fire_at_ms < 0 {
            return Err(TimerError::RegistrationFailed(format!(
                "negative fire time: {fire_at_ms}"
            )));
        }

        let delay_ms = (fire_at_ms - now_ms()).max(0) as u64;
        let handler = self.handler.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            handler.on_fire(kind).await;
        });

        let previous = self.lock_pending().insert(slot, task);
        if let Some(previous) = previous {
            previous.abort();
        }

        tracing::debug!(slot = %slot, kind = %kind, fire_at_ms, "trigger registered");
        Ok(())
    }

    async fn cancel_all(&self) {
        let mut pending = self.lock_pending();
        for (_, task) in pending.drain() {
            task.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in pending.drain() {
            task.abort();
        }
    }
}
