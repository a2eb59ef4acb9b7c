//! Exponential backoff for transient page fetch failures.
//!
//! Only transport errors, HTTP 429 and 5xx responses are retried. Missing
//! snapshots, I/O errors and other statuses are returned immediately. A 429
//! waits at least as long as its `Retry-After` asks, capped at
//! [`MAX_RETRY_AFTER_SECS`].

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Upper bound on a server-requested `Retry-After` wait.
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Returns `true` if `err` is worth another attempt after a backoff delay.
fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::Http(_) | FetchError::RateLimited { .. } => true,
        FetchError::UnexpectedStatus { status, .. } => *status >= 500,
        FetchError::Timeout { .. } | FetchError::MissingSnapshot { .. } | FetchError::Io { .. } => {
            false
        }
    }
}

/// Wait before retry `attempt + 1`: `backoff_base_secs * 2^attempt`
/// seconds, raised to the capped `Retry-After` of a rate-limit response.
fn retry_delay(err: &FetchError, attempt: u32, backoff_base_secs: u64) -> Duration {
    // Cap the shift to keep the multiplication from overflowing.
    let backoff_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    let requested_secs = match err {
        FetchError::RateLimited {
            retry_after_secs, ..
        } => (*retry_after_secs).min(MAX_RETRY_AFTER_SECS),
        _ => 0,
    };
    Duration::from_secs(backoff_secs.max(requested_secs))
}

/// Executes `operation`, retrying retriable errors up to `max_retries`
/// additional times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, or the server's `Retry-After` when that is longer. With
/// `max_retries = 2` the operation runs at most 3 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay = retry_delay(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs = delay.as_secs(),
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
