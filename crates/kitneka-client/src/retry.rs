//! Retry with exponential back-off and jitter for discovery requests.
//!
//! Only transient failures are retried: rate limiting (429), server errors
//! (5xx) and network timeouts or refused connections. Everything else,
//! including 404s and malformed bodies, is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::RateLimited { .. } => true,
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::Deserialize { .. }
        | ClientError::NotFound { .. }
        | ClientError::InvalidBaseUrl { .. }
        | ClientError::InvalidInput(_)
        | ClientError::Cache { .. } => false,
    }
}

/// Back-off before retry number `attempt` (1-based): `base * 2^(attempt-1)`
/// scaled by a random factor in `[0.75, 1.25)`, never above 30 s.
pub(crate) fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(20));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered =
        (computed.min(MAX_DELAY_MS) as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    jittered.min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// With `max_retries = 3` the operation runs at most 4 times. The last error
/// is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
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
                let delay_ms = backoff_delay_ms(backoff_base_ms, attempt);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient discovery error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
