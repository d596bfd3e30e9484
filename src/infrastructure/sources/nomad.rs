//! # Nomad Source
//!
//! Queries Nomad's calculator API, which publishes a base rate, the banking
//! IOF tax and two spreads, all as decimal strings.
//!
//! ```text
//! buy  = base * (1 + spread.default + iof.banking)
//! sell = base * (1 - spread.custom)
//! ```

use crate::domain::entities::{Quote, QuoteMetadata};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::arithmetic::{round_price, CheckedArithmetic};
use crate::domain::value_objects::{PriceOrdering, SourceId, ValidationProfile};
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::shared_client::HttpResource;
use crate::infrastructure::sources::traits::SourceAdapter;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

/// Default calculator endpoint.
pub const NOMAD_URL: &str = "https://api.benomad.us/forex-rates-s3/v1/calculator";

/// The API answers slowly; a shorter timeout than page sources.
pub const NOMAD_TIMEOUT_MS: u64 = 15_000;

/// Identifies Nomad quotes regardless of the endpoint queried.
pub const NOMAD_SOURCE_ID: &str = "https://www.nomadglobal.com";

const NOMAD_SITE: &str = "https://site.nomadglobal.com";

/// Calculator response. Only the fields used for pricing are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct NomadRateResponse {
    /// Base commercial rate.
    pub rate: NomadRate,
    /// Tax rates.
    pub iof: NomadIof,
    /// Spread rates.
    pub spread: NomadSpread,
}

/// `rate` object.
#[derive(Debug, Clone, Deserialize)]
pub struct NomadRate {
    /// BRL per USD.
    pub value: Decimal,
}

/// `iof` object.
#[derive(Debug, Clone, Deserialize)]
pub struct NomadIof {
    /// IOF applied to banking transfers, as a fraction.
    pub banking: Decimal,
}

/// `spread` object.
#[derive(Debug, Clone, Deserialize)]
pub struct NomadSpread {
    /// Spread on purchases, as a fraction.
    pub default: Decimal,
    /// Spread on sales, as a fraction.
    pub custom: Decimal,
}

/// Nomad calculator API adapter.
#[derive(Debug, Clone)]
pub struct NomadSource {
    source_id: SourceId,
    url: String,
    timeout_ms: u64,
    resource: Arc<dyn HttpResource>,
}

impl NomadSource {
    /// Creates the adapter against the public calculator API.
    #[must_use]
    pub fn new(resource: Arc<dyn HttpResource>) -> Self {
        Self {
            source_id: SourceId::new(NOMAD_SOURCE_ID),
            url: NOMAD_URL.to_string(),
            timeout_ms: NOMAD_TIMEOUT_MS,
            resource,
        }
    }

    /// Points the adapter at another calculator endpoint. The source id is kept.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn api_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static(NOMAD_SITE));
        headers.insert(REFERER, HeaderValue::from_static("https://site.nomadglobal.com/"));
        headers
    }

    /// Turns a calculator response into `(buy, sell)`.
    fn prices(response: &NomadRateResponse) -> SourceResult<(Decimal, Decimal)> {
        let base = response.rate.value;
        if base <= Decimal::ZERO {
            return Err(SourceError::unexpected_content(format!("invalid base rate: {base}")));
        }

        let buy_factor = Decimal::ONE
            .safe_add(response.spread.default)
            .and_then(|f| f.safe_add(response.iof.banking))
            .map_err(DomainError::from)?;
        let sell_factor = Decimal::ONE
            .safe_sub(response.spread.custom)
            .map_err(DomainError::from)?;

        let buy = base.safe_mul(buy_factor).map_err(DomainError::from)?;
        let sell = base.safe_mul(sell_factor).map_err(DomainError::from)?;
        Ok((round_price(buy), round_price(sell)))
    }
}

#[async_trait]
impl SourceAdapter for NomadSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    fn name(&self) -> &str {
        "Nomad"
    }

    fn validation_profile(&self) -> ValidationProfile {
        ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    async fn fetch(&self) -> SourceResult<Quote> {
        let client = self.resource.acquire()?;
        let response: NomadRateResponse = client
            .get_json(&self.url, self.timeout(), Self::api_headers())
            .await?;

        let (buy, sell) = Self::prices(&response)?;
        let spread_pct = response
            .spread
            .default
            .safe_mul(Decimal::ONE_HUNDRED)
            .map_err(DomainError::from)?;

        tracing::debug!(
            source = %self.source_id,
            base = %response.rate.value,
            %buy,
            %sell,
            "nomad rate decoded"
        );

        let metadata = QuoteMetadata::new()
            .mid_market_rate(response.rate.value)
            .spread_percentage(spread_pct)
            .currency_pair("USD/BRL")
            .provider("Nomad Global")
            .note("Includes IOF tax and spread");

        Ok(Quote::new(buy, sell, self.source_id.clone())?.with_metadata(metadata))
    }
}
