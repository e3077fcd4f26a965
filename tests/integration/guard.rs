//! Guard idempotence properties driven through trigger delivery.

use lumen::testing::MockWakeLock;
use lumen::{LockState, ScreenService, ServiceConfig, TriggerKind};
use std::sync::Arc;
use std::time::Duration;

fn service_over(mock: &MockWakeLock) -> ScreenService {
    ScreenService::new(ServiceConfig::default(), Arc::new(mock.clone())).unwrap()
}

/// Test: N consecutive acquires leave exactly one live handle.
#[tokio::test]
async fn test_n_acquires_hold_one_handle() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    for _ in 0..10 {
        service.keep_screen_on().await.unwrap();
    }

    assert_eq!(mock.live_count(), 1);
    assert_eq!(mock.acquire_count(), 1);
}

/// Test: N consecutive releases leave zero live handles and no error.
#[tokio::test]
async fn test_n_releases_leave_nothing_live() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    for _ in 0..10 {
        service.release_screen_on().await.unwrap();
    }

    assert_eq!(mock.live_count(), 0);
    assert_eq!(service.screen_state(), LockState::Released);
}

/// Test: acquire-then-release leaves the state exactly as before.
#[tokio::test]
async fn test_round_trip_is_identity() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    assert_eq!(service.screen_state(), LockState::Released);
    service.keep_screen_on().await.unwrap();
    service.release_screen_on().await.unwrap();

    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.live_count(), 0);
}

/// Test: the platform redelivering a turn-on trigger twice in immediate
/// succession holds exactly one handle, with no leak and no panic.
#[tokio::test]
async fn test_duplicate_turn_on_delivery() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);
    let handler = service.trigger_handler();

    handler.on_fire(TriggerKind::TurnOn).await;
    handler.on_fire(TriggerKind::TurnOn).await;

    assert_eq!(service.screen_state(), LockState::Held);
    assert_eq!(mock.live_count(), 1);
}

/// Test: without a release, the safety timeout returns the resource.
#[tokio::test]
async fn test_safety_timeout_backstop() {
    let mock = MockWakeLock::new();
    let config = ServiceConfig::default().with_safety_timeout(Duration::from_secs(1));
    let service = ScreenService::new(config, Arc::new(mock.clone())).unwrap();

    service.keep_screen_on().await.unwrap();
    assert!(service.is_screen_held());

    tokio::time::sleep(Duration::from_millis(1_300)).await;

    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.live_count(), 0);
}

/// Test: a refused acquire degrades to "nothing happened", not a crash.
#[tokio::test]
async fn test_primitive_refusal_is_non_fatal() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    mock.set_fail_acquire(true);
    assert!(service.keep_screen_on().await.is_err());
    assert_eq!(service.screen_state(), LockState::Released);

    // The service keeps operating once the primitive recovers.
    mock.set_fail_acquire(false);
    service.keep_screen_on().await.unwrap();
    assert!(service.is_screen_held());
}
