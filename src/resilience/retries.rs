//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failed attempt is retried
//! - Pause a fixed delay between attempts
//! - Bound the total number of attempts
//!
//! # Design Decisions
//! - Total attempts = 1 + max_retries
//! - Fixed delay, no jitter, no exponential growth
//! - Authentication failures and malformed requests are never retried

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::http::error::{ApiError, ApiResult};

/// Attempt bookkeeping for one logical call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
    attempt: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            attempt: 0,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, Duration::from_millis(config.delay_ms))
    }

    /// Attempts started so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether the retry budget allows another attempt.
    pub fn should_retry(&self) -> bool {
        self.attempt < self.max_attempts()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn start_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy runs out of attempts.
///
/// `on_retry` is called with the failed attempt number before each pause.
/// It is the only place a scheduled retry is reported, so callers log there
/// with whatever request context they hold.
pub async fn retry_async<F, Fut, T, R>(
    policy: &mut RetryPolicy,
    mut operation: F,
    mut on_retry: R,
) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
    R: FnMut(u32, &ApiError),
{
    loop {
        let attempt = policy.start_attempt();
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempts = attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if !error.is_retryable() {
                    debug!(attempt, error = %error, "Non-retryable error");
                    return Err(error);
                }
                if !policy.should_retry() {
                    warn!(
                        attempts = attempt,
                        error = %error,
                        "Retry budget exhausted"
                    );
                    return Err(error);
                }

                on_retry(attempt, &error);
                sleep(policy.delay()).await;
            }
        }
    }
}
