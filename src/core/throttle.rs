//! Minimum-interval pacing for outbound AQS requests.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Enforces a minimum interval between the start of consecutive requests.
///
/// The first call to [`Throttle::wait`] never sleeps. A zero interval disables
/// pacing entirely.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Sleep until `min_interval` has passed since the previous call, then
    /// record the current instant.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let ready_at = last + self.min_interval;
            if ready_at > Instant::now() {
                tracing::trace!(?ready_at, "throttling request");
                sleep_until(ready_at).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
