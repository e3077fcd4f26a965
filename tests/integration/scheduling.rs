//! Scheduled-window integration tests.
//!
//! These run against the real in-process tokio timer, so they use
//! short windows and polling waits rather than exact instants.

use async_trait::async_trait;
use lumen::testing::MockWakeLock;
use lumen::{
    Event, EventBus, EventHandler, LockState, ScreenService, ServiceConfig, now_ms,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::common::wait_for_state;

fn service_over(mock: &MockWakeLock) -> ScreenService {
    ScreenService::new(ServiceConfig::default(), Arc::new(mock.clone())).unwrap()
}

/// Test: a scheduled window turns the screen on at the on time and
/// releases it at the off time.
#[tokio::test]
async fn test_scheduled_window_turns_screen_on_then_off() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    let now = now_ms();
    service
        .schedule_screen_on_off(now + 100, now + 400)
        .await
        .unwrap();

    // Nothing happens before the on time.
    assert_eq!(service.screen_state(), LockState::Released);

    wait_for_state(&service, LockState::Held, Duration::from_secs(2)).await;
    assert_eq!(mock.live_count(), 1);

    wait_for_state(&service, LockState::Released, Duration::from_secs(2)).await;
    assert_eq!(mock.live_count(), 0);

    // Exactly one acquisition and one release for the whole window.
    assert_eq!(mock.acquire_count(), 1);
    assert_eq!(mock.release_count(), 1);
}

/// Test: an on time in the past fires immediately; the off time still
/// closes the window.
#[tokio::test]
async fn test_past_on_time_fires_immediately() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    let now = now_ms();
    service
        .schedule_screen_on_off(now - 1_000, now + 300)
        .await
        .unwrap();

    wait_for_state(&service, LockState::Held, Duration::from_secs(1)).await;
    wait_for_state(&service, LockState::Released, Duration::from_secs(2)).await;
}

/// Test: re-scheduling before either trigger fires overwrites both
/// slots, so only the second request's triggers ever fire.
#[tokio::test]
async fn test_reschedule_overwrites_pending_window() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    let now = now_ms();
    service
        .schedule_screen_on_off(now + 500, now + 800)
        .await
        .unwrap();
    service
        .schedule_screen_on_off(now + 100, now + 300)
        .await
        .unwrap();

    wait_for_state(&service, LockState::Held, Duration::from_secs(1)).await;
    wait_for_state(&service, LockState::Released, Duration::from_secs(1)).await;

    // Let the first request's would-be fire times pass as well.
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Two schedule calls, but only one window ran: not four firings.
    assert_eq!(mock.acquire_count(), 1);
    assert_eq!(mock.release_count(), 1);
    assert_eq!(service.screen_state(), LockState::Released);
}

/// Test: invalid windows are rejected up front and register nothing.
#[tokio::test]
async fn test_invalid_windows_are_rejected() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    let now = now_ms();
    assert!(service.schedule_screen_on_off(now + 500, now + 500).await.is_err());
    assert!(service.schedule_screen_on_off(now + 500, now + 100).await.is_err());
    assert!(service.schedule_screen_on_off(-1, now).await.is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.acquire_count(), 0);
}

struct RecordingHandler {
    events: Mutex<Vec<Event>>,
}

impl RecordingHandler {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    async fn events(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &Event) {
        self.events.lock().await.push(event.clone());
    }
}

/// Test: a full window emits the expected lifecycle event sequence.
#[tokio::test]
async fn test_window_emits_lifecycle_events() {
    let handler = RecordingHandler::new();
    let events = Arc::new(EventBus::new());
    events.register(handler.clone()).await;

    let mock = MockWakeLock::new();
    let service =
        ScreenService::with_event_bus(ServiceConfig::default(), Arc::new(mock.clone()), events)
            .unwrap();

    let now = now_ms();
    service
        .schedule_screen_on_off(now + 50, now + 200)
        .await
        .unwrap();

    wait_for_state(&service, LockState::Held, Duration::from_secs(1)).await;
    wait_for_state(&service, LockState::Released, Duration::from_secs(1)).await;

    let recorded = handler.events().await;

    let registered = recorded
        .iter()
        .filter(|e| matches!(e, Event::TriggerRegistered { .. }))
        .count();
    let fired = recorded
        .iter()
        .filter(|e| matches!(e, Event::TriggerFired { .. }))
        .count();
    let acquired = recorded
        .iter()
        .filter(|e| matches!(e, Event::LockAcquired { .. }))
        .count();
    let released = recorded
        .iter()
        .filter(|e| matches!(e, Event::LockReleased { .. }))
        .count();

    assert_eq!(registered, 2, "one registration per slot");
    assert_eq!(fired, 2, "both triggers fired");
    assert_eq!(acquired, 1, "one acquisition");
    assert_eq!(released, 1, "one release");
}
