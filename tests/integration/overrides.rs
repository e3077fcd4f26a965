//! Manual override tests: the direct keep/release operations
//! interleaved with scheduled trigger delivery.

use lumen::testing::MockWakeLock;
use lumen::{LockState, ScreenService, ServiceConfig, TriggerKind, now_ms};
use std::sync::Arc;
use std::time::Duration;

use crate::common::wait_for_state;

fn service_over(mock: &MockWakeLock) -> ScreenService {
    ScreenService::new(ServiceConfig::default(), Arc::new(mock.clone())).unwrap()
}

/// Test: a manual hold does not block a later scheduled (or stray)
/// turn-off trigger from releasing.
#[tokio::test]
async fn test_manual_hold_released_by_stray_turn_off() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    service.keep_screen_on().await.unwrap();
    assert_eq!(service.screen_state(), LockState::Held);

    // A stray turn-off trigger arrives from an old schedule.
    service.trigger_handler().on_fire(TriggerKind::TurnOff).await;

    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.live_count(), 0);
}

/// Test: releasing while already released reports success and changes
/// nothing.
#[tokio::test]
async fn test_release_while_released_is_ok() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    service.release_screen_on().await.unwrap();

    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.release_count(), 0);
}

/// Test: a manual hold before the scheduled on time collapses with the
/// scheduled acquire into one handle, and the off time still releases.
#[tokio::test]
async fn test_manual_hold_then_scheduled_window() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    service.keep_screen_on().await.unwrap();

    let now = now_ms();
    service
        .schedule_screen_on_off(now + 100, now + 300)
        .await
        .unwrap();

    // The scheduled turn-on finds the lock already held: no second handle.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(mock.live_count(), 1);
    assert_eq!(mock.acquire_count(), 1);

    wait_for_state(&service, LockState::Released, Duration::from_secs(1)).await;
    assert_eq!(mock.live_count(), 0);
}

/// Test: a manual release between the on and off triggers is not
/// undone; the later turn-off is absorbed as a no-op.
#[tokio::test]
async fn test_manual_release_mid_window() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    let now = now_ms();
    service
        .schedule_screen_on_off(now + 50, now + 400)
        .await
        .unwrap();

    wait_for_state(&service, LockState::Held, Duration::from_secs(1)).await;
    service.release_screen_on().await.unwrap();
    assert_eq!(service.screen_state(), LockState::Released);

    // The scheduled turn-off fires into an already-released guard.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.live_count(), 0);
}
