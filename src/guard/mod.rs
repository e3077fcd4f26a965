//! Wake-lock ownership.
//!
//! This module holds the boundary to the platform wake primitive and
//! the guard that is the resource's single owner within the process.

mod screen_guard;
mod wake_lock;

pub use screen_guard::{DEFAULT_SAFETY_TIMEOUT, DEFAULT_TAG, GuardError, ScreenGuard};
pub use wake_lock::{HeldLock, LoggingWakeLock, WakeLock, WakeLockError};
