//! Core vocabulary types for the wake scheduler.
//!
//! These types name the two trigger kinds, the registration slots that
//! distinguish their pending registrations, and the guard's lock state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch, as reported by the platform clock.
pub type EpochMillis = i64;

/// Current platform time in epoch milliseconds.
pub fn now_ms() -> EpochMillis {
    Utc::now().timestamp_millis()
}

/// The two kinds of deferred trigger a schedule produces.
///
/// The set is closed: trigger dispatch is an exhaustive match, so adding
/// a kind is a compile-visible change everywhere triggers are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Keep the display awake from this instant.
    TurnOn,
    /// Allow the display to sleep from this instant.
    TurnOff,
}

impl TriggerKind {
    /// The registration slot this kind of trigger occupies.
    pub fn slot(self) -> TriggerSlot {
        match self {
            TriggerKind::TurnOn => TriggerSlot::ON,
            TriggerKind::TurnOff => TriggerSlot::OFF,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKind::TurnOn => write!(f, "turn-on"),
            TriggerKind::TurnOff => write!(f, "turn-off"),
        }
    }
}

/// Identifier distinguishing the pending trigger registrations.
///
/// At most one registration may be outstanding per slot; registering
/// into an occupied slot replaces the previous registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerSlot(u8);

impl TriggerSlot {
    /// Slot holding the pending turn-on trigger.
    pub const ON: TriggerSlot = TriggerSlot(0);

    /// Slot holding the pending turn-off trigger.
    pub const OFF: TriggerSlot = TriggerSlot(1);

    /// Get the underlying slot index.
    pub fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TriggerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of the wake-lock guard.
///
/// Released --acquire--> Held; Held --release--> Released; repeating
/// either operation is a no-op. A safety-timeout expiry forces
/// Held --> Released. Initial state is Released; there is no terminal
/// state within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockState {
    /// No wake-lock handle is live; the display may sleep.
    Released,
    /// A wake-lock handle is live; the display stays awake.
    Held,
}

impl LockState {
    /// Check whether this state holds the resource.
    pub fn is_held(self) -> bool {
        self == LockState::Held
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockState::Released => write!(f, "released"),
            LockState::Held => write!(f, "held"),
        }
    }
}
