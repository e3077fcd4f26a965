//! Schedule request validation and scheduler error types.

use std::time::Duration;
use thiserror::Error;

use crate::core::types::EpochMillis;
use crate::trigger::TimerError;

/// Errors that can occur when scheduling.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A timestamp is missing or malformed.
    #[error("invalid {field} timestamp: {value}")]
    InvalidTimestamp {
        field: &'static str,
        value: EpochMillis,
    },

    /// The off time does not come after the on time.
    #[error("invalid window: off time {off_time_ms} must be after on time {on_time_ms}")]
    InvalidWindow {
        on_time_ms: EpochMillis,
        off_time_ms: EpochMillis,
    },

    /// The timer service rejected a trigger registration.
    #[error(transparent)]
    Registration(#[from] TimerError),
}

/// A validated request to keep the display awake between two instants.
///
/// Only obtainable through [`ScheduleRequest::new`], so holding one
/// means the timestamps already passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRequest {
    on_time_ms: EpochMillis,
    off_time_ms: EpochMillis,
}

impl ScheduleRequest {
    /// Validate and build a request.
    ///
    /// Timestamps are epoch milliseconds from the platform clock. Both
    /// must be non-negative and the off time must come after the on
    /// time. Instants in the past are allowed; their triggers fire
    /// immediately.
    pub fn new(
        on_time_ms: EpochMillis,
        off_time_ms: EpochMillis,
    ) -> Result<Self, ScheduleError> {
        if on_time_ms < 0 {
            return Err(ScheduleError::InvalidTimestamp {
                field: "on_time",
                value: on_time_ms,
            });
        }
        if off_time_ms < 0 {
            return Err(ScheduleError::InvalidTimestamp {
                field: "off_time",
                value: off_time_ms,
            });
        }
        if off_time_ms <= on_time_ms {
            return Err(ScheduleError::InvalidWindow {
                on_time_ms,
                off_time_ms,
            });
        }

        Ok(Self {
            on_time_ms,
            off_time_ms,
        })
    }

    /// The instant the display turns on.
    pub fn on_time_ms(&self) -> EpochMillis {
        self.on_time_ms
    }

    /// The instant the display is allowed to sleep.
    pub fn off_time_ms(&self) -> EpochMillis {
        self.off_time_ms
    }

    /// Length of the awake window.
    pub fn window(&self) -> Duration {
        Duration::from_millis((self.off_time_ms - self.on_time_ms) as u64)
    }
}
