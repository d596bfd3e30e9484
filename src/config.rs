//! # Configuration
//!
//! Layered settings, later layers winning:
//!
//! 1. Built-in defaults ([`AppConfig::default`])
//! 2. `config/default.{toml,yaml,json}` if present
//! 3. The file named by `FX_QUOTES_CONFIG`, if set
//! 4. `FX_QUOTES_*` environment variables, `__` separating sections
//!    (`FX_QUOTES_RETRY__MAX_ATTEMPTS=5`)
//! 5. `PORT`, for platforms that inject it
//!
//! `.env` files are loaded by the binary before this runs.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::quote_aggregation::QuoteAggregationEngine;
use crate::application::services::quote_cache::QuoteCache;
use crate::application::services::retry::{RetryConfig, RetryPolicy};
use crate::infrastructure::sources::nomad::{
    NomadSource, NOMAD_SOURCE_ID, NOMAD_TIMEOUT_MS, NOMAD_URL,
};
use crate::infrastructure::sources::nubank::{NubankSource, NUBANK_URL};
use crate::infrastructure::sources::shared_client::HttpResource;
use crate::infrastructure::sources::traits::{SourceAdapter, DEFAULT_SOURCE_TIMEOUT_MS};
use crate::infrastructure::sources::wise::{WiseSource, WISE_URL};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming an extra config file.
pub const CONFIG_PATH_ENV: &str = "FX_QUOTES_CONFIG";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FX_QUOTES";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Logging.
    pub log: LogConfig,
    /// Per-source retries.
    pub retry: RetrySettings,
    /// Collection behaviour.
    pub aggregation: AggregationSettings,
    /// Source endpoints.
    pub sources: SourcesConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Retry settings as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts per source per collection.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetrySettings {
    /// Converts to the policy's config.
    #[must_use]
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// Collection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Seconds a successful collection is reused; 0 disables caching.
    pub cache_ttl_secs: u64,
}

/// One source's endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Whether the source is queried.
    pub enabled: bool,
    /// Endpoint URL.
    pub url: String,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
}

impl SourceSettings {
    fn enabled(url: &str, timeout_ms: u64) -> Self {
        Self {
            enabled: true,
            url: url.to_string(),
            timeout_ms,
        }
    }
}

/// Settings for every known source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Wise converter page.
    pub wise: SourceSettings,
    /// Nubank conversion table.
    pub nubank: SourceSettings,
    /// Nomad calculator API.
    pub nomad: SourceSettings,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            wise: SourceSettings::enabled(WISE_URL, DEFAULT_SOURCE_TIMEOUT_MS),
            nubank: SourceSettings::enabled(NUBANK_URL, DEFAULT_SOURCE_TIMEOUT_MS),
            nomad: SourceSettings::enabled(NOMAD_URL, NOMAD_TIMEOUT_MS),
        }
    }
}

impl SourcesConfig {
    fn named(&self) -> [(&'static str, &SourceSettings); 3] {
        [("wise", &self.wise), ("nubank", &self.nubank), ("nomad", &self.nomad)]
    }

    /// Longest timeout among enabled sources, used as the client default.
    #[must_use]
    pub fn max_timeout_ms(&self) -> u64 {
        self.named()
            .iter()
            .filter(|(_, s)| s.enabled)
            .map(|(_, s)| s.timeout_ms)
            .max()
            .unwrap_or(DEFAULT_SOURCE_TIMEOUT_MS)
    }

    /// Builds adapters for the enabled sources, in Wise, Nubank, Nomad order.
    #[must_use]
    pub fn build_adapters(&self, resource: &Arc<dyn HttpResource>) -> Vec<Arc<dyn SourceAdapter>> {
        let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();
        if self.wise.enabled {
            adapters.push(Arc::new(
                WiseSource::new(Arc::clone(resource))
                    .with_url(&self.wise.url)
                    .with_timeout_ms(self.wise.timeout_ms),
            ));
        }
        if self.nubank.enabled {
            adapters.push(Arc::new(
                NubankSource::new(Arc::clone(resource))
                    .with_url(&self.nubank.url)
                    .with_timeout_ms(self.nubank.timeout_ms),
            ));
        }
        if self.nomad.enabled {
            adapters.push(Arc::new(
                NomadSource::new(Arc::clone(resource))
                    .with_url(&self.nomad.url)
                    .with_timeout_ms(self.nomad.timeout_ms),
            ));
        }
        adapters
    }
}

impl AppConfig {
    /// Loads settings from every layer.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a layer cannot be read,
    /// the merged settings do not deserialize, or they fail validation.
    pub fn load() -> ApplicationResult<Self> {
        let mut builder = Self::defaults_builder()?
            .add_source(File::with_name("config/default").required(false));

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        Self::finish(builder)
    }

    /// Loads defaults overlaid with an inline TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the document is invalid
    /// or the result fails validation.
    pub fn from_toml(document: &str) -> ApplicationResult<Self> {
        let builder =
            Self::defaults_builder()?.add_source(File::from_str(document, FileFormat::Toml));
        Self::finish(builder)
    }

    fn defaults_builder() -> ApplicationResult<ConfigBuilder<DefaultState>> {
        Ok(Config::builder().add_source(Config::try_from(&Self::default())?))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> ApplicationResult<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` describing the first problem.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.server.port == 0 {
            return Err(ApplicationError::configuration("server.port must be non-zero"));
        }
        if self.retry.max_attempts == 0 {
            return Err(ApplicationError::configuration("retry.max_attempts must be at least 1"));
        }

        let mut any_enabled = false;
        for (name, source) in self.sources.named() {
            if !source.enabled {
                continue;
            }
            any_enabled = true;
            if source.url.trim().is_empty() {
                return Err(ApplicationError::configuration(format!("sources.{name}.url is empty")));
            }
            if source.timeout_ms == 0 {
                return Err(ApplicationError::configuration(format!(
                    "sources.{name}.timeout_ms must be non-zero"
                )));
            }
        }

        if !any_enabled {
            return Err(ApplicationError::configuration("no source is enabled"));
        }
        Ok(())
    }

    /// Cache for collections, or `None` when the TTL is zero.
    #[must_use]
    pub fn cache(&self) -> Option<Arc<QuoteCache>> {
        let ttl_secs = self.aggregation.cache_ttl_secs;
        (ttl_secs > 0).then(|| Arc::new(QuoteCache::new(Duration::from_secs(ttl_secs))))
    }

    /// Builds the engine for the enabled sources.
    #[must_use]
    pub fn build_engine(&self, resource: &Arc<dyn HttpResource>) -> QuoteAggregationEngine {
        let engine = QuoteAggregationEngine::new(
            self.sources.build_adapters(resource),
            RetryPolicy::new(self.retry.to_retry_config()),
        );
        match self.cache() {
            Some(cache) => engine.with_cache(cache),
            None => engine,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::sources::shared_client::SharedHttpResource;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.retry.to_retry_config(), RetryConfig::default());
        assert_eq!(config.sources.nomad.timeout_ms, 15_000);
        assert!(config.cache().is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [log]
            format = "json"

            [aggregation]
            cache_ttl_secs = 60

            [sources.nubank]
            enabled = false
            url = "http://localhost/nubank"
            timeout_ms = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(!config.sources.nubank.enabled);
        assert!(config.sources.wise.enabled);
        assert_eq!(config.cache().unwrap().ttl(), Duration::from_secs(60));
    }

    #[test]
    fn rejects_zero_port() {
        let err = AppConfig::from_toml("[server]\nport = 0").unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn rejects_empty_url_and_zero_timeout() {
        let mut config = AppConfig::default();
        config.sources.wise.url = "  ".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("sources.wise.url"));

        let mut config = AppConfig::default();
        config.sources.nomad.timeout_ms = 0;
        assert!(config.validate().unwrap_err().to_string().contains("sources.nomad.timeout_ms"));
    }

    #[test]
    fn rejects_all_sources_disabled() {
        let mut config = AppConfig::default();
        config.sources.wise.enabled = false;
        config.sources.nubank.enabled = false;
        config.sources.nomad.enabled = false;
        assert!(config.validate().unwrap_err().to_string().contains("no source is enabled"));
    }

    #[test]
    fn disabled_sources_are_not_built() {
        let mut config = AppConfig::default();
        config.sources.nubank.enabled = false;
        let resource: Arc<dyn HttpResource> = Arc::new(SharedHttpResource::new(1000));

        let engine = config.build_engine(&resource);
        let ids: Vec<_> = engine.source_ids().iter().map(|id| id.as_str().to_string()).collect();
        assert_eq!(ids, vec![WISE_URL.to_string(), NOMAD_SOURCE_ID.to_string()]);
    }

    #[test]
    fn max_timeout_ignores_disabled_sources() {
        let mut config = AppConfig::default();
        config.sources.wise.enabled = false;
        config.sources.nubank.enabled = false;
        assert_eq!(config.sources.max_timeout_ms(), NOMAD_TIMEOUT_MS);
    }
}
