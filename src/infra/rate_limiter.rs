use async_trait::async_trait;
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::app::ports::RateLimiterPort;
use crate::config::HttpConfig;

/// Spacing policy between outbound requests
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub min_interval: Duration,
    /// Extra random wait in `[0, jitter]` added when a request has to wait
    pub jitter: Duration,
}

impl From<&HttpConfig> for Limits {
    fn from(http: &HttpConfig) -> Self {
        Self {
            min_interval: Duration::from_millis(http.min_delay_ms),
            jitter: Duration::from_millis(http.jitter_ms),
        }
    }
}

/// Keeps at least `min_interval` between consecutive requests
#[derive(Debug)]
pub struct RateLimiter {
    limits: Limits,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            last_request: Mutex::new(None),
        }
    }

    fn jitter(&self) -> Duration {
        let max = self.limits.jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }

    /// Time still to wait before the next request, given the previous one.
    fn remaining(&self, last: Option<Instant>, now: Instant) -> Duration {
        match last {
            Some(last) => self.limits.min_interval.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

#[async_trait]
impl RateLimiterPort for RateLimiter {
    async fn acquire(&self) {
        // Holding the lock across the sleep serializes callers
        let mut last = self.last_request.lock().await;
        let wait = self.remaining(*last, Instant::now());
        if !wait.is_zero() {
            tokio::time::sleep(wait + self.jitter()).await;
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new(Limits {
            min_interval: Duration::from_secs(1),
            jitter: Duration::ZERO,
        });
        assert_eq!(limiter.remaining(None, Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_remaining_wait() {
        let limiter = RateLimiter::new(Limits {
            min_interval: Duration::from_millis(1000),
            jitter: Duration::ZERO,
        });
        let last = Instant::now();
        let later = last + Duration::from_millis(400);
        assert_eq!(limiter.remaining(Some(last), later), Duration::from_millis(600));
        let much_later = last + Duration::from_secs(5);
        assert_eq!(limiter.remaining(Some(last), much_later), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let limiter = RateLimiter::new(Limits {
            min_interval: Duration::from_millis(50),
            jitter: Duration::from_millis(5),
        });
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
