use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use typed_builder::TypedBuilder;

/// Whether an operation may be re-issued after an ambiguous failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idempotency {
    /// Applying the operation twice has the same effect as applying it once.
    Idempotent,
    NonIdempotent,
}

/// Bounded retry with capped exponential backoff.
///
/// Errors are classified by [`StorageError::is_retryable`]: transient
/// backend failures are retried, while misses and query errors are returned
/// immediately. Failures with an unknown outcome are only retried for
/// [`Idempotency::Idempotent`] operations.
///
/// [`StorageError::is_retryable`]: crate::StorageError::is_retryable
#[derive(Debug, Clone, TypedBuilder)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    #[builder(default = 5)]
    max_attempts: u32,
    #[builder(default = Duration::from_millis(10))]
    initial_backoff: Duration,
    #[builder(default = Duration::from_secs(1))]
    max_backoff: Duration,
    #[builder(default = 2)]
    multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::builder().max_attempts(1).build()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before the given retry (1 for the first retry).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are exhausted. The last error is returned.
    pub async fn run<T, F, Fut>(&self, idempotency: Idempotency, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts && err.is_retryable(idempotency) => {
                    let delay = self.backoff(attempt);
                    debug!(
                        attempt,
                        max_attempts,
                        delay = ?delay,
                        error = %err,
                        "retrying storage operation"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
