//! # Retry Policy
//!
//! Bounded retries with exponential backoff around a single source.
//!
//! Each attempt runs the adapter's `fetch` under its own timeout and then
//! validates the quote against the adapter's profile. Any failure (transport,
//! parse, timeout or validation) consumes an attempt. Between attempts the
//! policy sleeps `base_delay * 2^attempt`:
//!
//! ```text
//! attempt 1 fails -> sleep 2 * base
//! attempt 2 fails -> sleep 4 * base
//! attempt 3 fails -> RetryExhausted
//! ```

use crate::domain::entities::Quote;
use crate::domain::services::validate;
use crate::domain::value_objects::SourceId;
use crate::infrastructure::sources::error::SourceError;
use crate::infrastructure::sources::traits::SourceAdapter;
use std::time::Duration;
use thiserror::Error;

/// Default number of attempts per source.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for backoff.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryConfig {
    /// Creates a config; `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Returns the maximum number of attempts.
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the base backoff delay.
    #[inline]
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay after the given failed attempt (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// A successful fetch and the failures that preceded it.
#[derive(Debug, Clone)]
pub struct RetryOutcome {
    /// The validated quote.
    pub quote: Quote,
    /// Attempts used, including the successful one.
    pub attempts: u32,
    /// Messages of the failed attempts before the success.
    pub prior_failures: Vec<String>,
}

/// Terminal failure of a source after all attempts.
#[derive(Debug, Clone, Error)]
#[error("{source_id} failed after {attempts} attempt(s): {last_error}")]
pub struct RetryExhausted {
    /// The failing source.
    pub source_id: SourceId,
    /// Attempts made.
    pub attempts: u32,
    /// Message of the last failure.
    pub last_error: String,
}

/// Applies [`RetryConfig`] to source adapters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a policy from a config.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the config.
    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Fetches and validates one quote, retrying on failure.
    ///
    /// # Errors
    ///
    /// Returns [`RetryExhausted`] after `max_attempts` consecutive failures.
    pub async fn execute(
        &self,
        adapter: &dyn SourceAdapter,
    ) -> Result<RetryOutcome, RetryExhausted> {
        let mut failures: Vec<String> = Vec::new();

        for attempt in 1..=self.config.max_attempts {
            match Self::attempt(adapter).await {
                Ok(quote) => {
                    if attempt > 1 {
                        tracing::info!(
                            source = %adapter.source_id(),
                            attempt,
                            "source recovered after retry"
                        );
                    }
                    return Ok(RetryOutcome {
                        quote,
                        attempts: attempt,
                        prior_failures: failures,
                    });
                }
                Err(error) => {
                    let retryable = error.is_retryable();
                    let message = error.to_string();
                    failures.push(message.clone());

                    if attempt < self.config.max_attempts {
                        let backoff = self.config.backoff_for(attempt);
                        tracing::warn!(
                            source = %adapter.source_id(),
                            attempt,
                            error = %message,
                            retryable,
                            backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                            "attempt failed, backing off"
                        );
                        tokio::time::sleep(backoff).await;
                    } else {
                        tracing::error!(
                            source = %adapter.source_id(),
                            attempt,
                            error = %message,
                            "all attempts failed"
                        );
                    }
                }
            }
        }

        Err(RetryExhausted {
            source_id: adapter.source_id().clone(),
            attempts: self.config.max_attempts,
            last_error: failures.pop().unwrap_or_default(),
        })
    }

    async fn attempt(adapter: &dyn SourceAdapter) -> Result<Quote, SourceError> {
        let timeout = adapter.timeout();
        let quote = match tokio::time::timeout(timeout, adapter.fetch()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SourceError::timeout_with_duration(
                    format!("{} did not answer in time", adapter.name()),
                    adapter.timeout_ms(),
                ));
            }
        };
        validate(&quote, &adapter.validation_profile())?;
        Ok(quote)
    }
}
