//! Rate limiting for outbound completion calls

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Gate awaited before each paced LLM call
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next call may start
    async fn acquire(&self);
}

/// No pacing at all
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}
}

/// Token bucket refilled one token per `refill_interval`.
///
/// With a capacity of 1 this spaces successive calls at least one interval
/// apart, while the first call goes out immediately.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    refill_interval: Duration,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            refill_interval,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Fixed delay between successive calls
    pub fn with_delay(delay: Duration) -> Self {
        Self::new(1, delay)
    }
}

impl BucketState {
    fn refill(&mut self, now: Instant, capacity: u32, interval: Duration) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let earned = elapsed.as_nanos() / interval.as_nanos();
        if earned == 0 {
            return;
        }

        let earned = earned.min(capacity as u128) as u32;
        self.tokens = (self.tokens + earned).min(capacity);
        if self.tokens == capacity {
            self.last_refill = now;
        } else {
            self.last_refill += interval * earned;
        }
    }
}

#[async_trait]
impl RateLimiter for TokenBucket {
    async fn acquire(&self) {
        if self.refill_interval.is_zero() {
            return;
        }

        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                state.refill(now, self.capacity, self.refill_interval);

                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }

                (state.last_refill + self.refill_interval).saturating_duration_since(now)
            };

            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_immediate() {
        let bucket = TokenBucket::with_delay(Duration::from_millis(200));
        let start = Instant::now();
        bucket.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successive_calls_are_spaced() {
        let bucket = TokenBucket::with_delay(Duration::from_millis(200));
        let start = Instant::now();

        for _ in 0..4 {
            bucket.acquire().await;
        }

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(600), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(700), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_refills_without_extra_credit() {
        let bucket = TokenBucket::with_delay(Duration::from_millis(200));
        bucket.acquire().await;

        tokio::time::sleep(Duration::from_secs(5)).await;

        let start = Instant::now();
        bucket.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        bucket.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_allows_bursts() {
        let bucket = TokenBucket::new(3, Duration::from_secs(1));
        let start = Instant::now();

        for _ in 0..3 {
            bucket.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        bucket.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let bucket = TokenBucket::with_delay(Duration::ZERO);
        for _ in 0..100 {
            bucket.acquire().await;
        }
        Unlimited.acquire().await;
    }
}
