//! # Telemetry
//!
//! Installs the global `tracing` subscriber. `RUST_LOG`, when set, takes
//! precedence over the configured level.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to `level`.
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if `level` is not a valid
/// filter directive.
pub fn env_filter(level: &str) -> ApplicationResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| {
            ApplicationError::configuration(format!("invalid log.level {level:?}: {e}"))
        }),
    }
}

/// Initializes tracing once for the process.
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if the level is invalid or a
/// global subscriber is already installed.
pub fn init(config: &LogConfig) -> ApplicationResult<()> {
    let filter = env_filter(&config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(false))
            .try_init(),
    };

    result.map_err(|e| {
        ApplicationError::configuration(format!("failed to initialize tracing: {e}"))
    })?;
    tracing::info!(level = %config.level, format = ?config.format, "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(env_filter("fx_quotes=loud").is_err());
    }

    #[test]
    fn accepts_directives() {
        assert!(env_filter("fx_quotes=debug,tower_http=info").is_ok());
    }
}
