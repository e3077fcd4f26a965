//! Scheduling of the display's awake window.
//!
//! This module validates a (turn-on, turn-off) request and converts it
//! into two deferred trigger registrations with the timer service.

mod engine;
mod types;

pub use engine::ScreenScheduler;
pub use types::{ScheduleError, ScheduleRequest};
