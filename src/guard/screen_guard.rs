//! Single owner of the wake-lock resource.
//!
//! `ScreenGuard` serializes every acquire/release through one mutex so
//! concurrent trigger firings never race on the held state, and arms a
//! safety-timeout watchdog so a lost turn-off trigger cannot leak the
//! resource forever. Both operations are idempotent, which is what lets
//! duplicate and out-of-order trigger delivery be absorbed upstream.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

use crate::core::types::LockState;
use crate::events::{Event, EventBus};
use crate::guard::wake_lock::{HeldLock, WakeLock, WakeLockError};

/// Default wake-lock tag.
pub const DEFAULT_TAG: &str = "lumen:wake_lock";

/// Default safety timeout: the upper bound on any single hold.
///
/// A backstop for the turn-off trigger never arriving (process killed,
/// reboot cleared the timer, clock manipulation). It is independent of
/// the requested off time and is not the primary off mechanism.
pub const DEFAULT_SAFETY_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Errors that can occur in the guard.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The underlying platform primitive refused the operation.
    #[error(transparent)]
    Unavailable(#[from] WakeLockError),
}

/// Mutable guard state, protected by one mutex.
///
/// Shared with the watchdog tasks, which is why it lives behind an Arc
/// rather than inline in the guard.
struct GuardInner {
    /// The single live handle, if any. Never exposed by reference.
    held: Option<Box<dyn HeldLock>>,
    /// Bumped on every fresh acquire; a watchdog armed for an older
    /// generation recognizes that its hold has already ended.
    generation: u64,
}

/// Single owner of the wake-lock handle.
///
/// Lifecycle: construct once per process. The handle is created lazily
/// on first acquire and destroyed on release; dropping the guard
/// releases any handle still held, so the resource is returned on every
/// exit path.
pub struct ScreenGuard {
    lock: Arc<dyn WakeLock>,
    tag: String,
    safety_timeout: Duration,
    events: Arc<EventBus>,
    inner: Arc<Mutex<GuardInner>>,
}

impl ScreenGuard {
    /// Create a guard over the given platform primitive with defaults.
    pub fn new(lock: Arc<dyn WakeLock>) -> Self {
        Self {
            lock,
            tag: DEFAULT_TAG.to_string(),
            safety_timeout: DEFAULT_SAFETY_TIMEOUT,
            events: Arc::new(EventBus::new()),
            inner: Arc::new(Mutex::new(GuardInner {
                held: None,
                generation: 0,
            })),
        }
    }

    /// Set the wake-lock tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the safety timeout.
    pub fn with_safety_timeout(mut self, timeout: Duration) -> Self {
        self.safety_timeout = timeout;
        self
    }

    /// Set the event bus.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Get the wake-lock tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the safety timeout.
    pub fn safety_timeout(&self) -> Duration {
        self.safety_timeout
    }

    /// Get the current lock state.
    pub fn state(&self) -> LockState {
        if lock_inner(&self.inner).held.is_some() {
            LockState::Held
        } else {
            LockState::Released
        }
    }

    /// Check whether the wake lock is currently held.
    pub fn is_held(&self) -> bool {
        self.state().is_held()
    }

    /// Acquire the wake lock.
    ///
    /// Idempotent: if a live handle is already held this is a no-op and
    /// never creates a second handle. A handle the platform's own
    /// timeout already expired is detected and replaced by a fresh
    /// acquisition. On success a watchdog is armed that forces a
    /// release once the safety timeout elapses.
    pub async fn acquire(&self) -> Result<(), GuardError> {
        let generation = {
            let mut inner = lock_inner(&self.inner);
            if let Some(handle) = inner.held.as_ref() {
                if handle.is_held() {
                    return Ok(());
                }
                // The primitive's own timeout ended this hold; start fresh.
                inner.held = None;
            }

            let handle = self.lock.acquire(&self.tag, Some(self.safety_timeout))?;
            inner.held = Some(handle);
            inner.generation += 1;
            inner.generation
        };

        tracing::debug!(tag = %self.tag, "wake lock acquired");
        self.events.emit(Event::lock_acquired(self.tag.clone())).await;
        self.arm_watchdog(generation);
        Ok(())
    }

    /// Release the wake lock.
    ///
    /// Idempotent: releasing while nothing is held is a no-op and never
    /// errors. If the primitive refuses the release, the handle is
    /// still dropped (its drop makes a best-effort release) and the
    /// refusal is reported; the guard does not stay wedged in Held.
    pub async fn release(&self) -> Result<(), GuardError> {
        let result = {
            let mut inner = lock_inner(&self.inner);
            match inner.held.take() {
                Some(mut handle) => Some(handle.release()),
                None => None,
            }
        };

        let Some(result) = result else {
            return Ok(());
        };

        self.events.emit(Event::lock_released(self.tag.clone())).await;
        match result {
            Ok(()) => {
                tracing::debug!(tag = %self.tag, "wake lock released");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(tag = %self.tag, error = %e, "wake lock release refused");
                Err(e.into())
            }
        }
    }

    /// Arm the safety-timeout watchdog for the given hold generation.
    ///
    /// The task captures only the shared state, not the guard, so a
    /// dropped guard is not kept alive by its own watchdog. Racing with
    /// a legitimate release (or a newer acquire) is absorbed: the
    /// generation check makes a stale watchdog a no-op, and either
    /// winner leaves the guard Released.
    fn arm_watchdog(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let events = Arc::clone(&self.events);
        let tag = self.tag.clone();
        let timeout = self.safety_timeout;

        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;

            let handle = {
                let mut inner = lock_inner(&inner);
                if inner.generation != generation {
                    return;
                }
                inner.held.take()
            };
            let Some(mut handle) = handle else {
                return;
            };

            tracing::warn!(
                tag = %tag,
                timeout = ?timeout,
                "safety timeout expired, forcing wake lock release"
            );
            if let Err(e) = handle.release() {
                tracing::warn!(tag = %tag, error = %e, "forced release refused");
            }
            events.emit(Event::safety_timeout_expired(tag)).await;
        });
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let mut inner = lock_inner(&self.inner);
        if let Some(mut handle) = inner.held.take() {
            match handle.release() {
                Ok(()) => tracing::debug!(tag = %self.tag, "wake lock released on teardown"),
                Err(e) => {
                    tracing::warn!(tag = %self.tag, error = %e, "teardown release refused");
                }
            }
        }
    }
}

/// Lock the guard state, recovering from poisoning.
///
/// The state stays consistent even if a panic unwound through a holder:
/// the worst a poisoned lock can hide is a handle we are about to
/// release anyway.
fn lock_inner(inner: &Mutex<GuardInner>) -> MutexGuard<'_, GuardInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
