//! Minimum-interval rate limiter for the upstream API
//!
//! One limiter is shared by every call of a crawl job. Grants are serialized
//! through an async mutex, so the interval holds even if callers run in
//! parallel.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between the starts of consecutive requests
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,

    /// When the previous request was granted
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a request may start, then records the grant
    ///
    /// Suspends the task with a timer rather than spinning. The lock is held
    /// across the wait so that grants come out strictly one after another.
    pub async fn acquire(&self) {
        let mut last_grant = self.last_grant.lock().await;

        if let Some(wait) = time_until_next_request(*last_grant, self.min_interval, Instant::now())
        {
            tracing::trace!("Rate limiter waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }

        *last_grant = Some(Instant::now());
    }
}

/// Time left before the next request may start
///
/// Returns None if a request can be made now.
fn time_until_next_request(
    last_grant: Option<Instant>,
    min_interval: Duration,
    now: Instant,
) -> Option<Duration> {
    let last = last_grant?;
    let elapsed = now.saturating_duration_since(last);
    if elapsed < min_interval {
        Some(min_interval - elapsed)
    } else {
        None
    }
}
