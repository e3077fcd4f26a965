//! Teardown integration tests.
//!
//! The wake lock must be returned on every exit path: explicit
//! shutdown, and plain drop of the owning service.

use lumen::testing::MockWakeLock;
use lumen::{LockState, ScreenService, ServiceConfig, now_ms};
use std::sync::Arc;
use std::time::Duration;

fn service_over(mock: &MockWakeLock) -> ScreenService {
    ScreenService::new(ServiceConfig::default(), Arc::new(mock.clone())).unwrap()
}

/// Test: shutdown releases a held lock.
#[tokio::test]
async fn test_shutdown_releases_held_lock() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    service.keep_screen_on().await.unwrap();
    assert_eq!(mock.live_count(), 1);

    service.shutdown().await;

    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.live_count(), 0);
}

/// Test: shutdown cancels pending triggers, so nothing fires later.
#[tokio::test]
async fn test_shutdown_cancels_pending_window() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    let now = now_ms();
    service
        .schedule_screen_on_off(now + 100, now + 200)
        .await
        .unwrap();

    service.shutdown().await;

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(service.screen_state(), LockState::Released);
    assert_eq!(mock.acquire_count(), 0);
}

/// Test: shutdown twice is safe.
#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let mock = MockWakeLock::new();
    let service = service_over(&mock);

    service.keep_screen_on().await.unwrap();
    service.shutdown().await;
    service.shutdown().await;

    assert_eq!(mock.live_count(), 0);
}

/// Test: dropping the service without calling shutdown still returns
/// the resource through the guard's drop path.
#[tokio::test]
async fn test_drop_without_shutdown_releases() {
    let mock = MockWakeLock::new();
    {
        let service = service_over(&mock);
        service.keep_screen_on().await.unwrap();
        assert_eq!(mock.live_count(), 1);
        drop(service);
    }

    // Pending timer tasks are aborted on drop; give the runtime a
    // moment to run those aborts before asserting.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(mock.live_count(), 0);
}

/// Test: a service that scheduled a window and is then dropped fires
/// nothing afterwards.
#[tokio::test]
async fn test_drop_cancels_pending_window() {
    let mock = MockWakeLock::new();
    {
        let service = service_over(&mock);
        let now = now_ms();
        service
            .schedule_screen_on_off(now + 100, now + 200)
            .await
            .unwrap();
        drop(service);
    }

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(mock.acquire_count(), 0);
    assert_eq!(mock.live_count(), 0);
}
