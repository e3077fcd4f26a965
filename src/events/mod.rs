//! Lifecycle events and event handling.
//!
//! This module provides event emission for trigger and wake-lock
//! lifecycle events, enabling observability into the scheduling window.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::core::types::{EpochMillis, TriggerKind, TriggerSlot};

/// Lifecycle events emitted while a schedule runs.
#[derive(Debug, Clone)]
pub enum Event {
    /// A trigger was registered with the timer service.
    TriggerRegistered {
        slot: TriggerSlot,
        kind: TriggerKind,
        fire_at_ms: EpochMillis,
        timestamp: Instant,
    },

    /// A trigger fired and was dispatched to the guard.
    TriggerFired {
        kind: TriggerKind,
        timestamp: Instant,
    },

    /// The wake lock was acquired; the display stays awake.
    LockAcquired { tag: String, timestamp: Instant },

    /// The wake lock was released; the display may sleep.
    LockReleased { tag: String, timestamp: Instant },

    /// The safety timeout expired and forced a release.
    SafetyTimeoutExpired { tag: String, timestamp: Instant },
}

impl Event {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> Instant {
        match self {
            Event::TriggerRegistered { timestamp, .. } => *timestamp,
            Event::TriggerFired { timestamp, .. } => *timestamp,
            Event::LockAcquired { timestamp, .. } => *timestamp,
            Event::LockReleased { timestamp, .. } => *timestamp,
            Event::SafetyTimeoutExpired { timestamp, .. } => *timestamp,
        }
    }

    /// Create a TriggerRegistered event.
    pub fn trigger_registered(slot: TriggerSlot, kind: TriggerKind, fire_at_ms: EpochMillis) -> Self {
        Event::TriggerRegistered {
            slot,
            kind,
            fire_at_ms,
            timestamp: Instant::now(),
        }
    }

    /// Create a TriggerFired event.
    pub fn trigger_fired(kind: TriggerKind) -> Self {
        Event::TriggerFired {
            kind,
            timestamp: Instant::now(),
        }
    }

    /// Create a LockAcquired event.
    pub fn lock_acquired(tag: impl Into<String>) -> Self {
        Event::LockAcquired {
            tag: tag.into(),
            timestamp: Instant::now(),
        }
    }

    /// Create a LockReleased event.
    pub fn lock_released(tag: impl Into<String>) -> Self {
        Event::LockReleased {
            tag: tag.into(),
            timestamp: Instant::now(),
        }
    }

    /// Create a SafetyTimeoutExpired event.
    pub fn safety_timeout_expired(tag: impl Into<String>) -> Self {
        Event::SafetyTimeoutExpired {
            tag: tag.into(),
            timestamp: Instant::now(),
        }
    }
}

/// Handler for receiving lifecycle events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an event.
    async fn handle(&self, event: &Event);
}

/// Event bus for distributing events to registered handlers.
pub struct EventBus {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    /// Create a new event bus with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register an event handler.
    pub async fn register(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write().await;
        handlers.push(handler);
    }

    /// Emit an event to all registered handlers.
    pub async fn emit(&self, event: Event) {
        let handlers = self.handlers.read().await;
        for handler in handlers.iter() {
            handler.handle(&event).await;
        }
    }

    /// Get the number of registered handlers.
    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
