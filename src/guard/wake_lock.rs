//! Platform wake-lock primitive boundary.
//!
//! The OS facility that keeps the display powered is an external
//! collaborator; this crate only assumes `acquire(tag, timeout)` /
//! `release` semantics behind the [`WakeLock`] seam. A live acquisition
//! is a [`HeldLock`] value: dropping it releases the resource, so the
//! lock cannot outlive its owner no matter which exit path runs.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors from the platform wake primitive.
#[derive(Debug, Error)]
pub enum WakeLockError {
    /// The platform refused to acquire or release the lock.
    #[error("wake lock unavailable: {0}")]
    Unavailable(String),
}

/// A live wake-lock handle.
///
/// While a handle reports `is_held`, the display must stay powered.
/// Implementations release the underlying resource when the handle is
/// dropped; an explicit [`release`](HeldLock::release) beforehand lets
/// the caller observe a refusal.
pub trait HeldLock: Send + fmt::Debug {
    /// Whether the underlying resource is still held.
    ///
    /// May turn false without a `release` call when the primitive's own
    /// timeout expired the acquisition.
    fn is_held(&self) -> bool;

    /// Release the underlying resource.
    ///
    /// Idempotent: releasing an already-released handle is a no-op.
    fn release(&mut self) -> Result<(), WakeLockError>;
}

/// Factory for wake-lock handles.
///
/// `timeout` is an upper bound after which the platform may end the
/// acquisition on its own; callers pass the safety timeout here so the
/// resource cannot leak even if this process never releases.
pub trait WakeLock: Send + Sync {
    /// Acquire the lock under `tag`.
    fn acquire(
        &self,
        tag: &str,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn HeldLock>, WakeLockError>;
}

/// Wake lock that only logs transitions.
///
/// Stand-in for platforms without a power-manager integration; the CLI
/// runs on it, and it is useful for wiring checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingWakeLock;

#[derive(Debug)]
struct LoggingHandle {
    tag: String,
    held: bool,
}

impl HeldLock for LoggingHandle {
    fn is_held(&self) -> bool {
        self.held
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        if self.held {
            self.held = false;
            tracing::info!(tag = %self.tag, "wake lock released");
        }
        Ok(())
    }
}

impl Drop for LoggingHandle {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

impl WakeLock for LoggingWakeLock {
    fn acquire(
        &self,
        tag: &str,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn HeldLock>, WakeLockError> {
        tracing::info!(tag = %tag, ?timeout, "wake lock acquired");
        Ok(Box::new(LoggingHandle {
            tag: tag.to_string(),
            held: true,
        }))
    }
}
