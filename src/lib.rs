//! lumen — display wake scheduling and wake-lock ownership.
//!
//! lumen converts a (turn-on, turn-off) pair of instants into two
//! deferred triggers and guarantees the wake-lock resource behind them
//! is acquired and released exactly once per window, even under
//! duplicate, reordered, or missed trigger delivery.
//!
//! The pieces:
//!
//! - [`ScreenScheduler`] registers the two triggers with a
//!   [`TimerService`] (slot 0 = on, slot 1 = off; re-registration
//!   overwrites).
//! - [`TriggerHandler`] is the asynchronous callback target: turn-on
//!   acquires, turn-off releases, nothing else required to be alive.
//! - [`ScreenGuard`] owns the single wake-lock handle behind the
//!   [`WakeLock`] platform seam, with idempotent transitions and a
//!   safety-timeout backstop against a lost turn-off trigger.
//! - [`ScreenService`] composes the three with a documented
//!   init/teardown lifecycle and the manual-override operations.

pub mod config;
pub mod core;
pub mod events;
pub mod guard;
pub mod scheduler;
pub mod service;
pub mod testing;
pub mod trigger;

pub use config::{ConfigError, ServiceConfig, load_service_config};
pub use core::types::{EpochMillis, LockState, TriggerKind, TriggerSlot, now_ms};
pub use events::{Event, EventBus, EventHandler};
pub use guard::{
    DEFAULT_SAFETY_TIMEOUT, DEFAULT_TAG, GuardError, HeldLock, LoggingWakeLock, ScreenGuard,
    WakeLock, WakeLockError,
};
pub use scheduler::{ScheduleError, ScheduleRequest, ScreenScheduler};
pub use service::ScreenService;
pub use trigger::{TimerError, TimerService, TokioTimer, TriggerHandler};
