//! Global outbound request rate limiting
//!
//! A single [`RateLimiter`] is shared by every request-issuing path. It is a
//! token bucket of capacity one refilled once per interval, so no two grants
//! are ever closer together than the configured minimum spacing, no matter
//! how many accession pipelines are waiting on it.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Jitter, Quota,
};
use tracing::trace;

use crate::errors::{ConfigError, ConfigResult};

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared gate enforcing a minimum interval between requests
pub struct RateLimiter {
    limiter: DirectLimiter,
    min_interval: Duration,
    jitter: Duration,
    granted: AtomicU64,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval)
            .field("jitter", &self.jitter)
            .field("granted", &self.granted())
            .finish()
    }
}

impl RateLimiter {
    /// Create a limiter allowing one request per `min_interval`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the interval is zero
    pub fn new(min_interval: Duration) -> ConfigResult<Self> {
        Self::with_jitter(min_interval, Duration::ZERO)
    }

    /// Create a limiter that additionally delays each grant by up to `jitter`
    ///
    /// Jitter only ever lengthens the spacing between requests.
    pub fn with_jitter(min_interval: Duration, jitter: Duration) -> ConfigResult<Self> {
        let quota = Quota::with_period(min_interval)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "min_request_interval".to_string(),
                value: format!("{:?}", min_interval),
                reason: "Request interval must be non-zero".to_string(),
            })?
            .allow_burst(NonZeroU32::MIN);

        Ok(Self {
            limiter: DirectLimiter::direct(quota),
            min_interval,
            jitter,
            granted: AtomicU64::new(0),
        })
    }

    /// Wait until one request may be issued
    ///
    /// Over-limit callers are parked until the next slot opens; this never
    /// fails.
    pub async fn acquire(&self) {
        if self.jitter.is_zero() {
            self.limiter.until_ready().await;
        } else {
            self.limiter
                .until_ready_with_jitter(Jitter::up_to(self.jitter))
                .await;
        }
        let granted = self.granted.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("Rate limiter granted request #{}", granted);
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of requests granted so far
    pub fn granted(&self) -> u64 {
        self.granted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    // governor and tokio read different monotonic clocks
    const TIMER_SLACK: Duration = Duration::from_millis(5);

    #[test]
    fn test_zero_interval_fails() {
        let result = RateLimiter::new(Duration::ZERO);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(60)).unwrap();

        let start = Instant::now();
        limiter.acquire().await;

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.granted(), 1);
    }

    #[tokio::test]
    async fn test_three_requests_span_two_intervals() {
        let interval = Duration::from_millis(100);
        let limiter = RateLimiter::new(interval).unwrap();

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() + TIMER_SLACK >= interval * 2);
        assert_eq!(limiter.granted(), 3);
    }

    #[tokio::test]
    async fn test_limit_is_global_across_callers() {
        let interval = Duration::from_millis(100);
        let limiter = Arc::new(RateLimiter::new(interval).unwrap());

        let start = Instant::now();
        let callers = (0..3).map(|_| {
            let limiter = limiter.clone();
            async move { limiter.acquire().await }
        });
        futures::future::join_all(callers).await;

        assert!(start.elapsed() + TIMER_SLACK >= interval * 2);
        assert_eq!(limiter.granted(), 3);
    }

    #[tokio::test]
    async fn test_jitter_never_shortens_interval() {
        let interval = Duration::from_millis(50);
        let limiter = RateLimiter::with_jitter(interval, Duration::from_millis(10)).unwrap();

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() + TIMER_SLACK >= interval);
    }
}
