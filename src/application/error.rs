//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Aggregation(AggregationError) - No sources, or every source failed
//! ├── Domain(DomainError)           - Statistics over the collected quotes
//! └── Configuration(String)         - Invalid or unreadable settings
//! ```
//!
//! # Examples
//!
//! ```
//! use fx_quotes::application::error::ApplicationError;
//!
//! let err = ApplicationError::configuration("server.port must be non-zero");
//! assert!(err.is_configuration());
//! ```

use crate::application::services::quote_aggregation::AggregationError;
use crate::domain::errors::DomainError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Quote collection failed.
    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Domain rule violation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if every configured source failed.
    #[must_use]
    pub fn is_all_sources_failed(&self) -> bool {
        matches!(self, Self::Aggregation(AggregationError::AllSourcesFailed(_)))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<config::ConfigError> for ApplicationError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::quote_aggregation::SourceFailure;
    use crate::domain::value_objects::SourceId;

    #[test]
    fn configuration_error() {
        let err = ApplicationError::configuration("missing url");
        assert!(err.to_string().contains("configuration"));
        assert!(err.to_string().contains("missing url"));
        assert!(err.is_configuration());
    }

    #[test]
    fn from_aggregation_error() {
        let failure = SourceFailure {
            source: SourceId::new("wise"),
            error: "timed out".to_string(),
            attempts: 3,
        };
        let err: ApplicationError = AggregationError::AllSourcesFailed(vec![failure]).into();
        assert!(err.is_all_sources_failed());
        assert!(err.to_string().contains("wise (timed out)"));
    }

    #[test]
    fn from_domain_error() {
        let err: ApplicationError = DomainError::EmptyQuoteSet.into();
        assert!(err.to_string().contains("no quotes available"));
        assert!(!err.is_all_sources_failed());
    }

    #[test]
    fn from_config_error() {
        let err: ApplicationError = config::ConfigError::Message("bad port".to_string()).into();
        assert!(err.is_configuration());
    }
}
