//! Entry point for trigger firings.

use std::sync::Arc;

use crate::core::types::TriggerKind;
use crate::events::{Event, EventBus};
use crate::guard::ScreenGuard;

/// Maps fired triggers onto guard transitions.
///
/// The handler holds only the guard and the event bus, so it stays
/// invocable after whatever scheduled the triggers is gone: the timer
/// service may deliver a firing long after the requesting caller was
/// dropped. Reentrancy and duplicate delivery are safe because both
/// guard operations are idempotent.
#[derive(Clone)]
pub struct TriggerHandler {
    guard: Arc<ScreenGuard>,
    events: Arc<EventBus>,
}

impl TriggerHandler {
    /// Create a handler driving the given guard.
    pub fn new(guard: Arc<ScreenGuard>, events: Arc<EventBus>) -> Self {
        Self { guard, events }
    }

    /// Handle a fired trigger.
    ///
    /// Guard refusals are logged and swallowed: a trigger firing has no
    /// caller left to retry, and the system continues in whatever state
    /// it is in.
    pub async fn on_fire(&self, kind: TriggerKind) {
        self.events.emit(Event::trigger_fired(kind)).await;

        let result = match kind {
            TriggerKind::TurnOn => self.guard.acquire().await,
            TriggerKind::TurnOff => self.guard.release().await,
        };

        if let Err(e) = result {
            tracing::warn!(kind = %kind, error = %e, "trigger had no effect");
        }
    }
}
