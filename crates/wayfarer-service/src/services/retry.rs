//! Bounded retry of whole read-decide-write sequences
//!
//! Only `TransactionConflict` is retried. Each attempt must open a fresh
//! transaction and re-read state; the closure passed to [`RetryPolicy::run`]
//! is the unit that gets repeated.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use wayfarer_common::RetryConfig;

use super::error::ServiceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(15);

    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Backoff before attempt `attempt + 1`: doubling base delay plus up to one base delay of jitter
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as u64;
        if base == 0 {
            return Duration::ZERO;
        }
        let exponential = base.saturating_mul(1 << attempt.saturating_sub(1).min(6));
        let jitter = rand::thread_rng().gen_range(0..=base);
        Duration::from_millis(exponential + jitter)
    }

    /// Run `attempt` until it succeeds, fails with a non-retryable error, or the budget is spent.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut attempt: F) -> ServiceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ServiceResult<T>>,
    {
        let mut tries = 0;
        loop {
            tries += 1;
            match attempt().await {
                Err(err) if err.is_retryable() && tries < self.max_attempts => {
                    let delay = self.backoff(tries);
                    debug!(operation, attempt = tries, delay_ms = delay.as_millis() as u64, "Conflict, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_retryable() => {
                    warn!(operation, attempts = tries, "Conflict retry budget exhausted");
                    return Err(err);
                }
                result => return result,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BASE_DELAY)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay())
    }
}
