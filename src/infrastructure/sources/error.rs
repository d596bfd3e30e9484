//! # Source Errors
//!
//! Error types for source adapter operations.
//!
//! Adapters report failures as [`SourceError`]. The retry policy does not
//! branch on the variant; every error is a failed attempt. The
//! classification helpers exist for logging.
//!
//! # Examples
//!
//! ```
//! use fx_quotes::infrastructure::sources::error::SourceError;
//!
//! let error = SourceError::timeout("Request timed out after 30000ms");
//! assert!(error.is_retryable());
//!
//! let error = SourceError::unexpected_content("rate cell not found");
//! assert!(!error.is_retryable());
//! ```

use crate::domain::errors::DomainError;
use thiserror::Error;

/// Error type for source adapter operations.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Request timed out.
    #[error("source timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("source connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("source rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// The response could not be decoded.
    #[error("source protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// The response decoded but did not contain what the adapter looks for.
    #[error("source unexpected content: {message}")]
    UnexpectedContent {
        /// Error message.
        message: String,
    },

    /// The extracted quote failed plausibility checks.
    #[error("quote validation failed: {0}")]
    Validation(#[from] DomainError),

    /// Internal adapter error.
    #[error("source internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl SourceError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an unexpected content error.
    #[must_use]
    pub fn unexpected_content(message: impl Into<String>) -> Self {
        Self::UnexpectedContent {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the failure looks transient (network level).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns true if the quote was fetched but rejected by validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PriceField;
    use rust_decimal::Decimal;

    #[test]
    fn network_errors_are_retryable() {
        assert!(SourceError::timeout("t").is_retryable());
        assert!(SourceError::timeout_with_duration("t", 10).is_retryable());
        assert!(SourceError::connection("c").is_retryable());
        assert!(SourceError::rate_limited("r").is_retryable());
    }

    #[test]
    fn content_errors_are_not_retryable() {
        assert!(!SourceError::protocol("p").is_retryable());
        assert!(!SourceError::unexpected_content("u").is_retryable());
        assert!(!SourceError::internal("i").is_retryable());
    }

    #[test]
    fn validation_wraps_domain_error() {
        let err: SourceError = DomainError::NonPositivePrice {
            field: PriceField::Buy,
            value: Decimal::NEGATIVE_ONE,
        }
        .into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("buy_price"));
    }

    #[test]
    fn display_format() {
        let display = SourceError::timeout("request timed out").to_string();
        assert!(display.contains("timeout"));
        assert!(display.contains("request timed out"));
    }
}
