//! Provider request pacing
//!
//! Fixed spacing of `60 / requests_per_minute` seconds between consecutive
//! grants. There is no burst allowance and no adaptive backoff from provider
//! feedback: this is plain spacing, not a token bucket. The first grant is
//! measured from construction, so the request issued before the first
//! `acquire()` is paced too.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use rankscout_common::{Error, Result};

/// Default token budget (requests per minute)
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 10;

/// Rate limiter enforcing a requests-per-minute budget
#[derive(Debug)]
pub struct RateLimiter {
    last_grant: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Create a limiter for `requests_per_minute`
    ///
    /// A zero budget is a configuration error.
    pub fn per_minute(requests_per_minute: u32) -> Result<Self> {
        if requests_per_minute == 0 {
            return Err(Error::Config(
                "requests_per_minute must be greater than zero".to_string(),
            ));
        }

        Ok(Self::with_interval(
            Duration::from_secs(60) / requests_per_minute,
        ))
    }

    /// Create a limiter with an explicit spacing
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            last_grant: Mutex::new(Instant::now()),
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next request is permitted
    pub async fn acquire(&self) {
        let mut last = self.last_grant.lock().await;

        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            tracing::debug!(wait_ms = wait_time.as_millis() as u64, "Rate limiting: waiting");
            tokio::time::sleep(wait_time).await;
        }

        *last = Instant::now();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_interval(Duration::from_secs(60) / DEFAULT_REQUESTS_PER_MINUTE)
    }
}
