//! Process-wide service facade.
//!
//! `ScreenService` is the single owner of the scheduling pipeline and
//! the wake-lock guard, with an explicit lifecycle: build one per
//! process, call [`shutdown`](ScreenService::shutdown) on the way out.
//! The guard additionally releases on drop, so the resource is returned
//! even when teardown is skipped.

use std::sync::Arc;

use crate::config::{ConfigError, ServiceConfig};
use crate::core::types::{EpochMillis, LockState};
use crate::events::EventBus;
use crate::guard::{GuardError, ScreenGuard, WakeLock};
use crate::scheduler::{ScheduleError, ScreenScheduler};
use crate::trigger::{TimerService, TokioTimer, TriggerHandler};

/// The request surface for display wake scheduling.
///
/// Exposes the two-instant scheduling operation plus the two direct
/// manual overrides that bypass scheduling and act on the guard
/// immediately.
pub struct ScreenService {
    guard: Arc<ScreenGuard>,
    timer: Arc<TokioTimer>,
    scheduler: ScreenScheduler<TokioTimer>,
    events: Arc<EventBus>,
}

impl ScreenService {
    /// Create a service with a private event bus.
    pub fn new(config: ServiceConfig, lock: Arc<dyn WakeLock>) -> Result<Self, ConfigError> {
        Self::with_event_bus(config, lock, Arc::new(EventBus::new()))
    }

    /// Create a service emitting on the given event bus.
    pub fn with_event_bus(
        config: ServiceConfig,
        lock: Arc<dyn WakeLock>,
        events: Arc<EventBus>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let guard = Arc::new(
            ScreenGuard::new(lock)
                .with_tag(config.tag.clone())
                .with_safety_timeout(config.safety_timeout())
                .with_event_bus(Arc::clone(&events)),
        );
        let handler = TriggerHandler::new(Arc::clone(&guard), Arc::clone(&events));
        let timer = Arc::new(TokioTimer::new(handler));
        let scheduler =
            ScreenScheduler::new(Arc::clone(&timer)).with_event_bus(Arc::clone(&events));

        Ok(Self {
            guard,
            timer,
            scheduler,
            events,
        })
    }

    /// Get the event bus this service emits on.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Schedule the display to stay awake between two instants.
    ///
    /// Registers a turn-on trigger at `on_time_ms` and a turn-off
    /// trigger at `off_time_ms` (epoch milliseconds), overwriting any
    /// pending triggers from an earlier request. Re-scheduling does not
    /// undo the effect of a trigger that already fired.
    pub async fn schedule_screen_on_off(
        &self,
        on_time_ms: EpochMillis,
        off_time_ms: EpochMillis,
    ) -> Result<(), ScheduleError> {
        self.scheduler.schedule_at(on_time_ms, off_time_ms).await
    }

    /// Keep the display awake starting now, bypassing scheduling.
    pub async fn keep_screen_on(&self) -> Result<(), GuardError> {
        self.guard.acquire().await
    }

    /// Let the display sleep starting now, bypassing scheduling.
    ///
    /// A pure resource release: pending triggers stay registered and a
    /// later turn-on trigger will re-acquire.
    pub async fn release_screen_on(&self) -> Result<(), GuardError> {
        self.guard.release().await
    }

    /// Current state of the wake-lock guard.
    pub fn screen_state(&self) -> LockState {
        self.guard.state()
    }

    /// Check whether the display is currently being kept awake.
    pub fn is_screen_held(&self) -> bool {
        self.guard.is_held()
    }

    /// The callback target for externally delivered triggers.
    ///
    /// Platforms that deliver trigger firings themselves (instead of
    /// going through the in-process timer) invoke this handler; it
    /// needs no other application state to be alive.
    pub fn trigger_handler(&self) -> TriggerHandler {
        TriggerHandler::new(Arc::clone(&self.guard), Arc::clone(&self.events))
    }

    /// Tear the service down: cancel pending triggers and release the
    /// wake lock. Idempotent; safe to call on any exit path.
    pub async fn shutdown(&self) {
        self.timer.cancel_all().await;
        if let Err(e) = self.guard.release().await {
            tracing::warn!(error = %e, "release during shutdown refused");
        }
        tracing::info!("screen service shut down");
    }
}
