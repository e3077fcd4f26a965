//! Trigger delivery: the timer-service boundary and the fire handler.
//!
//! The timer service owns pending triggers between registration and
//! firing; the handler is the asynchronous entry point it invokes, and
//! needs no application state beyond the guard to do its job.

mod handler;
mod timer;

pub use handler::TriggerHandler;
pub use timer::{TimerError, TimerService, TokioTimer};
