//! Common test utilities shared across integration tests.

use lumen::{LockState, ScreenService};
use std::time::Duration;

/// Wait for the service's lock state to reach `expected`, polling.
///
/// This is more reliable than fixed sleeps since timer delivery can
/// lag. Polls every 10ms and times out after the specified duration.
///
/// # Panics
///
/// Panics if the timeout is reached before the state is observed.
pub async fn wait_for_state(service: &ScreenService, expected: LockState, timeout: Duration) {
    let start = tokio::time::Instant::now();
    loop {
        if service.screen_state() == expected {
            return;
        }
        if start.elapsed() > timeout {
            panic!(
                "Timeout waiting for state {:?}, current state: {:?}",
                expected,
                service.screen_state()
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
