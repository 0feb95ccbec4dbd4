//! Sliding window rate limiter.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding window rate limiter.
///
/// Allows at most `capacity` requests in any `window`. The artworks API
/// asks anonymous clients to stay under 60 requests per minute, which is
/// the default. A bulk selection over many pages is the main consumer.
///
/// Cheap to clone; clones share the same quota.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use artifex_lib::rate_limit::RateLimiter;
///
/// let limiter = RateLimiter::new(10, Duration::from_secs(1));
/// assert_eq!(limiter.capacity(), 10);
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

struct Inner {
    sent: Mutex<VecDeque<Instant>>,
    capacity: u32,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter allowing `capacity` requests per `window`.
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                sent: Mutex::new(VecDeque::with_capacity(capacity.min(1024) as usize)),
                capacity: capacity.max(1),
                window,
            }),
        }
    }

    /// Creates a limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(u32::MAX, Duration::ZERO)
    }

    /// Waits until a request may be sent, then records it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut sent = self.inner.sent.lock().await;
                let now = Instant::now();
                self.prune(&mut sent, now);

                if (sent.len() as u32) < self.inner.capacity {
                    sent.push_back(now);
                    return;
                }

                sent.front()
                    .map(|&oldest| (oldest + self.inner.window).saturating_duration_since(now))
            };

            // Wait outside the lock
            if let Some(wait) = wait {
                log::debug!("Rate limit reached, waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
    }

    /// Returns the number of requests that can be sent without waiting.
    pub async fn available(&self) -> u32 {
        let mut sent = self.inner.sent.lock().await;
        self.prune(&mut sent, Instant::now());
        self.inner.capacity.saturating_sub(sent.len() as u32)
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> u32 {
        self.inner.capacity
    }

    /// Returns the configured window.
    pub fn window(&self) -> Duration {
        self.inner.window
    }

    fn prune(&self, sent: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&ts) = sent.front() {
            if now.saturating_duration_since(ts) >= self.inner.window {
                sent.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(60, Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_available_counts_down() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert_eq!(limiter.available().await, 3);

        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(limiter.available().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_quota() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let clone = limiter.clone();

        clone.acquire().await;
        assert_eq!(limiter.available().await, 1);
    }

    #[tokio::test]
    async fn test_unlimited_never_blocks() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(limiter.available().await > 0);
    }
}
