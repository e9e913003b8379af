use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::page::MutationWatch;

/// Frame-like polling cadence for the settle loop, so it stays responsive
/// to mutation bursts without a fixed long timer.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Wait until no mutation has been observed for `stability_window`
/// continuously, or until `max_wait` total has elapsed, whichever first.
///
/// Always returns. Callers cannot distinguish "settled" from "timed out"
/// and must treat the wait as pacing only, never as a completion signal.
/// The caller owns the watch handle; dropping it afterwards unsubscribes.
pub async fn settle(watch: &dyn MutationWatch, stability_window: Duration, max_wait: Duration) {
    let started = Instant::now();
    let mut last_revision = watch.revision();
    let mut last_change = started;

    loop {
        sleep(POLL_INTERVAL).await;
        let now = Instant::now();

        let revision = watch.revision();
        if revision != last_revision {
            last_revision = revision;
            last_change = now;
        }

        if now.duration_since(last_change) >= stability_window {
            return;
        }
        if now.duration_since(started) >= max_wait {
            return;
        }
    }
}
