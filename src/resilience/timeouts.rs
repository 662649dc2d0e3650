//! Timeout enforcement.
//!
//! # Responsibilities
//! - Race one attempt against the configured budget
//! - Drop the losing network future so it cannot hold the caller
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::http::error::{ApiError, ApiResult};

/// Run `fut`, failing with `ApiError::Timeout` if it has not settled
/// within `budget`.
pub async fn with_timeout<F, T>(budget: Duration, fut: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    match timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout {
            after_ms: budget.as_millis() as u64,
        }),
    }
}
