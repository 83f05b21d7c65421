//! Retry with exponential backoff and jitter for storefront requests.
//!
//! Transient failures (429, network errors, 5xx) are retried; everything
//! else (GraphQL errors, bad response shapes, 404s) is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::StorefrontError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`StorefrontError::RateLimited`]: HTTP 429; the storefront asked us to back off.
/// - [`StorefrontError::Http`]: network-level failure (connection reset, timeout).
/// - [`StorefrontError::UnexpectedStatus`] with a 5xx status.
pub(crate) fn is_retriable(err: &StorefrontError) -> bool {
    match err {
        StorefrontError::RateLimited { .. } | StorefrontError::Http(_) => true,
        StorefrontError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The sleep before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, capped at 60 s and scaled by a random factor in `[0.75, 1.25)`.
/// With `max_retries = 3` the operation is attempted at most 4 times total.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, StorefrontError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorefrontError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_secs
                    .saturating_mul(1_000)
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient storefront error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
