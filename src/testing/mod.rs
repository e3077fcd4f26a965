//! Testing utilities for users of the lumen library.
//!
//! This module provides helpers for testing wake scheduling:
//!
//! - [`MockWakeLock`]: a wake primitive that counts live handles and
//!   can be told to refuse operations
//! - [`ManualTimer`]: a timer service that records registrations and
//!   fires them only when a test says so

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::core::types::{EpochMillis, TriggerKind, TriggerSlot};
use crate::guard::{HeldLock, WakeLock, WakeLockError};
use crate::trigger::{TimerError, TimerService, TriggerHandler};

/// A wake primitive for testing.
///
/// Counts acquisitions, releases, and currently live handles, and can
/// be configured to refuse either operation. Clones share state, so a
/// test can keep one clone for assertions and hand another to the
/// guard.
///
/// # Example
///
/// ```
/// use lumen::testing::MockWakeLock;
/// use lumen::WakeLock;
///
/// let mock = MockWakeLock::new();
/// let handle = mock.acquire("test:lock", None).unwrap();
/// assert_eq!(mock.live_count(), 1);
/// drop(handle);
/// assert_eq!(mock.live_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockWakeLock {
    state: Arc<MockLockState>,
}

#[derive(Debug, Default)]
struct MockLockState {
    live: AtomicUsize,
    acquires: AtomicUsize,
    releases: AtomicUsize,
    fail_acquire: AtomicBool,
    fail_release: AtomicBool,
    /// Per-handle held flags, so `expire_live_handles` can flip live
    /// handles without confusing handles that were already released.
    handles: Mutex<Vec<Weak<AtomicBool>>>,
}

impl MockWakeLock {
    /// Create a new mock wake primitive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently live.
    pub fn live_count(&self) -> usize {
        self.state.live.load(Ordering::SeqCst)
    }

    /// Number of successful acquisitions so far.
    pub fn acquire_count(&self) -> usize {
        self.state.acquires.load(Ordering::SeqCst)
    }

    /// Number of successful explicit releases so far.
    pub fn release_count(&self) -> usize {
        self.state.releases.load(Ordering::SeqCst)
    }

    /// Make subsequent acquires fail with `Unavailable`.
    pub fn set_fail_acquire(&self, fail: bool) {
        self.state.fail_acquire.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent explicit releases fail with `Unavailable`.
    ///
    /// Dropping a handle still reclaims it, the way an OS reclaims a
    /// destroyed handle.
    pub fn set_fail_release(&self, fail: bool) {
        self.state.fail_release.store(fail, Ordering::SeqCst);
    }

    /// Expire every live handle, as if the primitive's own timeout ran
    /// out. Handles stay allocated but report `is_held() == false`.
    pub fn expire_live_handles(&self) {
        let mut handles = lock(&self.state.handles);
        for weak in handles.drain(..) {
            if let Some(flag) = weak.upgrade() {
                flag.store(false, Ordering::SeqCst);
            }
        }
        self.state.live.store(0, Ordering::SeqCst);
    }
}

impl WakeLock for MockWakeLock {
    fn acquire(
        &self,
        _tag: &str,
        _timeout: Option<Duration>,
    ) -> Result<Box<dyn HeldLock>, WakeLockError> {
        if self.state.fail_acquire.load(Ordering::SeqCst) {
            return Err(WakeLockError::Unavailable(
                "injected acquire failure".to_string(),
            ));
        }

        self.state.acquires.fetch_add(1, Ordering::SeqCst);
        self.state.live.fetch_add(1, Ordering::SeqCst);

        let flag = Arc::new(AtomicBool::new(true));
        let mut handles = lock(&self.state.handles);
        handles.retain(|weak| weak.upgrade().is_some());
        handles.push(Arc::downgrade(&flag));
        drop(handles);

        Ok(Box::new(MockHeldLock {
            state: Arc::clone(&self.state),
            flag,
            released: false,
        }))
    }
}

#[derive(Debug)]
struct MockHeldLock {
    state: Arc<MockLockState>,
    /// True while the primitive considers this acquisition live.
    flag: Arc<AtomicBool>,
    /// True once this handle gave the resource back.
    released: bool,
}

impl MockHeldLock {
    fn reclaim(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // Only decrement if the handle was still live; an expired
        // acquisition was already taken off the count.
        if self.flag.swap(false, Ordering::SeqCst) {
            let _ = self
                .state
                .live
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        }
    }
}

impl HeldLock for MockHeldLock {
    fn is_held(&self) -> bool {
        !self.released && self.flag.load(Ordering::SeqCst)
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        if self.released {
            return Ok(());
        }
        if self.state.fail_release.load(Ordering::SeqCst) {
            return Err(WakeLockError::Unavailable(
                "injected release failure".to_string(),
            ));
        }

        self.reclaim();
        self.state.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for MockHeldLock {
    fn drop(&mut self) {
        self.reclaim();
    }
}

/// A timer service for testing.
///
/// Records registrations per slot without ever firing on its own; a
/// test drives delivery explicitly with [`fire`](ManualTimer::fire).
/// Clones share state.
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Arc<ManualTimerState>,
}

#[derive(Default)]
struct ManualTimerState {
    handler: Mutex<Option<TriggerHandler>>,
    slots: Mutex<HashMap<TriggerSlot, (TriggerKind, EpochMillis)>>,
    fail_register: AtomicBool,
    register_count: AtomicUsize,
}

impl ManualTimer {
    /// Create a new manual timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect the handler that [`fire`](ManualTimer::fire) delivers to.
    pub fn connect(&self, handler: TriggerHandler) {
        *lock(&self.state.handler) = Some(handler);
    }

    /// The registration currently pending in a slot.
    pub fn pending(&self, slot: TriggerSlot) -> Option<(TriggerKind, EpochMillis)> {
        lock(&self.state.slots).get(&slot).copied()
    }

    /// Number of slots with a pending registration.
    pub fn pending_count(&self) -> usize {
        lock(&self.state.slots).len()
    }

    /// Total registrations accepted, including overwrites.
    pub fn register_count(&self) -> usize {
        self.state.register_count.load(Ordering::SeqCst)
    }

    /// Make subsequent registrations fail.
    pub fn set_fail_register(&self, fail: bool) {
        self.state.fail_register.store(fail, Ordering::SeqCst);
    }

    /// Deliver the trigger pending in `slot` to the connected handler.
    ///
    /// # Panics
    ///
    /// Panics if nothing is registered in the slot or no handler is
    /// connected.
    pub async fn fire(&self, slot: TriggerSlot) {
        let (kind, _) = lock(&self.state.slots)
            .remove(&slot)
            .unwrap_or_else(|| panic!("no trigger registered in slot {slot}"));
        let handler = lock(&self.state.handler)
            .clone()
            .unwrap_or_else(|| panic!("no handler connected"));
        handler.on_fire(kind).await;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl TimerService for ManualTimer {
    async fn register(
        &self,
        slot: TriggerSlot,
        kind: TriggerKind,
        fire_at_ms: EpochMillis,
    ) -> Result<(), TimerError> {
        if self.state.fail_register.load(Ordering::SeqCst) {
            return Err(TimerError::RegistrationFailed(
                "injected registration failure".to_string(),
            ));
        }

        lock(&self.state.slots).insert(slot, (kind, fire_at_ms));
        self.state.register_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn cancel_all(&self) {
        lock(&self.state.slots).clear();
    }
}
