//! Bounded retry with exponential backoff for collaborator calls.
//!
//! Storage and network calls go through [`retry_with_backoff`]; synthesis
//! calls do not (their failures are consumed by the fit loop's attempt
//! budget instead).

use std::future::Future;
use std::time::Duration;

use crate::config::RetrySettings;
use crate::services::ServiceError;

/// Retry policy for a class of calls.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Delay multiplier between attempts.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            multiplier: settings.multiplier,
        }
    }
}

/// Run `op`, retrying retryable [`ServiceError`]s with exponential backoff.
///
/// Non-retryable errors and the final failed attempt return immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    label: &str,
    config: &RetryConfig,
    mut op: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    "{} failed (attempt {}/{}), retrying in {:?}: {}",
                    label,
                    attempt,
                    max_attempts,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(config.multiplier);
            }
            Err(err) => return Err(err),
        }
    }
}
