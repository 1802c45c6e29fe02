//! Countdown background task

use std::time::Duration;
use tokio::{runtime::Handle, task::JoinHandle, time::sleep};
use tracing::debug;

/// Spawn a one-shot countdown that calls `on_expiry` after `delay`.
///
/// Aborting the returned handle before the delay elapses disarms it.
/// `on_expiry` is synchronous, so once it has started an abort no longer
/// interrupts it.
pub fn spawn_countdown<F>(runtime: &Handle, delay: Duration, on_expiry: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    runtime.spawn(async move {
        debug!("Countdown armed for {:?}", delay);
        sleep(delay).await;
        on_expiry();
    })
}
