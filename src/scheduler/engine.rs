//! Scheduler implementation.
//!
//! The scheduler is responsible for:
//! - Validating the (turn-on, turn-off) pair
//! - Registering the two triggers with the timer service
//! - Surfacing registration failures instead of pretending success
//!
//! It never blocks until fire time and never touches the wake lock;
//! firing is the trigger handler's job.

use std::sync::Arc;

use crate::core::types::{EpochMillis, TriggerKind, TriggerSlot};
use crate::events::{Event, EventBus};
use crate::scheduler::types::{ScheduleError, ScheduleRequest};
use crate::trigger::TimerService;

/// Scheduler for the display's awake window.
pub struct ScreenScheduler<T: TimerService> {
    timer: Arc<T>,
    events: Arc<EventBus>,
}

impl<T: TimerService> ScreenScheduler<T> {
    /// Create a scheduler over the given timer service.
    pub fn new(timer: Arc<T>) -> Self {
        Self {
            timer,
            events: Arc::new(EventBus::new()),
        }
    }

    /// Set the event bus.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Register the request's two triggers: turn-on into slot 0 and
    /// turn-off into slot 1, overwriting anything previously pending in
    /// those slots.
    ///
    /// If the off registration fails after the on registration
    /// succeeded, the pending turn-on trigger is left in place (the
    /// platform's slot state) and the error is returned; the guard's
    /// safety timeout bounds the damage of an on-without-off window.
    pub async fn schedule(&self, request: ScheduleRequest) -> Result<(), ScheduleError> {
        self.register(TriggerSlot::ON, TriggerKind::TurnOn, request.on_time_ms())
            .await?;
        self.register(TriggerSlot::OFF, TriggerKind::TurnOff, request.off_time_ms())
            .await?;

        tracing::info!(
            on_time_ms = request.on_time_ms(),
            off_time_ms = request.off_time_ms(),
            window = ?request.window(),
            "awake window scheduled"
        );
        Ok(())
    }

    /// Validate a timestamp pair and schedule it in one step.
    pub async fn schedule_at(
        &self,
        on_time_ms: EpochMillis,
        off_time_ms: EpochMillis,
    ) -> Result<(), ScheduleError> {
        self.schedule(ScheduleRequest::new(on_time_ms, off_time_ms)?)
            .await
    }

    async fn register(
        &self,
        slot: TriggerSlot,
        kind: TriggerKind,
        fire_at_ms: EpochMillis,
    ) -> Result<(), ScheduleError> {
        self.timer.register(slot, kind, fire_at_ms).await?;
        self.events
            .emit(Event::trigger_registered(slot, kind, fire_at_ms))
            .await;
        Ok(())
    }
}
