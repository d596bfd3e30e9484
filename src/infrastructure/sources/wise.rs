//! # Wise Source
//!
//! Scrapes the Wise currency-converter page for the USD→BRL mid-market rate
//! and derives buy/sell prices from a fixed spread.
//!
//! Convention: BRL per 1 USD. Buying USD costs more BRL than selling it
//! returns, so `buy_price > sell_price` and both sit in `[4.0, 7.0]`.

use crate::domain::entities::{Quote, QuoteMetadata};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::arithmetic::{round_price, CheckedArithmetic};
use crate::domain::value_objects::{PriceOrdering, SourceId, ValidationProfile};
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::extract::{
    compiled, parse_localized_decimal, visible_text, LazyRegex,
};
use crate::infrastructure::sources::shared_client::HttpResource;
use crate::infrastructure::sources::traits::{SourceAdapter, DEFAULT_SOURCE_TIMEOUT_MS};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use rust_decimal::Decimal;
use std::sync::{Arc, LazyLock};

/// Default converter page.
pub const WISE_URL: &str = "https://wise.com/es/currency-converter/usd-to-brl-rate?amount=1";

/// Spread applied on each side of the mid-market rate (0.5 %).
pub const WISE_SPREAD: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// `1 USD = 5,385 BRL`; the leading amount is optional.
static RATE_PATTERN: LazyRegex =
    LazyLock::new(|| Regex::new(r"(?i)(?:[\d.,]+\s*USD\s*)?=\s*([\d.,]+)\s*BRL"));

/// Wise converter page adapter.
#[derive(Debug, Clone)]
pub struct WiseSource {
    source_id: SourceId,
    url: String,
    timeout_ms: u64,
    spread: Decimal,
    resource: Arc<dyn HttpResource>,
}

impl WiseSource {
    /// Creates the adapter against the public converter page.
    #[must_use]
    pub fn new(resource: Arc<dyn HttpResource>) -> Self {
        Self {
            source_id: SourceId::new(WISE_URL),
            url: WISE_URL.to_string(),
            timeout_ms: DEFAULT_SOURCE_TIMEOUT_MS,
            spread: WISE_SPREAD,
            resource,
        }
    }

    /// Points the adapter at another URL; the source id follows the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self.source_id = SourceId::new(self.url.clone());
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn page_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("es-ES,es;q=0.9,en;q=0.8"));
        headers
    }

    /// Finds `... = <rate> BRL` in the page text.
    fn extract_rate(text: &str) -> SourceResult<(Decimal, String)> {
        let captures = compiled(&RATE_PATTERN)?
            .captures(text)
            .ok_or_else(|| SourceError::unexpected_content("rate element not found on page"))?;

        let raw = captures.get(0).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
        let number = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

        let rate = parse_localized_decimal(number).ok_or_else(|| {
            SourceError::unexpected_content(format!("could not parse rate from text: \"{raw}\""))
        })?;

        if rate <= Decimal::ZERO {
            return Err(SourceError::unexpected_content(format!("invalid rate value: {rate}")));
        }
        Ok((rate, raw))
    }

    fn price_with_spread(&self, mid: Decimal, widen: bool) -> SourceResult<Decimal> {
        let factor = if widen {
            Decimal::ONE.safe_add(self.spread)
        } else {
            Decimal::ONE.safe_sub(self.spread)
        }
        .map_err(DomainError::from)?;
        let price = mid.safe_mul(factor).map_err(DomainError::from)?;
        Ok(round_price(price))
    }
}

#[async_trait]
impl SourceAdapter for WiseSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    fn name(&self) -> &str {
        "Wise"
    }

    fn validation_profile(&self) -> ValidationProfile {
        ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    async fn fetch(&self) -> SourceResult<Quote> {
        let client = self.resource.acquire()?;
        let html = client
            .get_text(&self.url, self.timeout(), Self::page_headers())
            .await?;

        let text = visible_text(&html)?;
        let (mid, raw_text) = Self::extract_rate(&text)?;

        let buy = self.price_with_spread(mid, true)?;
        let sell = self.price_with_spread(mid, false)?;

        let spread_pct = self
            .spread
            .safe_mul(Decimal::ONE_HUNDRED)
            .map_err(DomainError::from)?;
        let metadata = QuoteMetadata::new()
            .mid_market_rate(mid)
            .spread_percentage(spread_pct)
            .raw_text(raw_text)
            .currency_pair("USD/BRL")
            .provider("Wise");

        tracing::debug!(source = %self.source_id, %mid, %buy, %sell, "wise rate extracted");

        Ok(Quote::new(buy, sell, self.source_id.clone())?.with_metadata(metadata))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::sources::shared_client::SharedHttpResource;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><body>
        <h1>Conversor de USD a BRL</h1>
        <div class="midMarketRate_abc"><span dir="ltr">1 USD = 5,385 BRL</span></div>
        </body></html>"#;

    async fn adapter_for(server: &MockServer) -> WiseSource {
        let resource: Arc<dyn HttpResource> = Arc::new(SharedHttpResource::new(5000));
        WiseSource::new(resource).with_url(format!("{}/wise", server.uri()))
    }

    #[tokio::test]
    async fn fetch_applies_spread_to_mid_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wise"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let source = adapter_for(&server).await;
        let quote = source.fetch().await.unwrap();

        // 5.385 * 1.005 = 5.411925, 5.385 * 0.995 = 5.358075
        assert_eq!(quote.buy_price(), Decimal::new(54119, 4));
        assert_eq!(quote.sell_price(), Decimal::new(53581, 4));
        assert_eq!(quote.source().as_str(), format!("{}/wise", server.uri()));

        let metadata = quote.metadata();
        assert_eq!(metadata.mid_market_rate, Some(Decimal::new(5385, 3)));
        assert_eq!(metadata.spread_percentage, Some(Decimal::new(5, 1)));
        assert_eq!(metadata.raw_text.as_deref(), Some("1 USD = 5,385 BRL"));
        assert_eq!(metadata.provider.as_deref(), Some("Wise"));
    }

    #[tokio::test]
    async fn fetched_quote_passes_own_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let source = adapter_for(&server).await;
        let quote = source.fetch().await.unwrap();
        assert!(crate::domain::services::validate(&quote, &source.validation_profile()).is_ok());
    }

    #[tokio::test]
    async fn page_without_rate_is_unexpected_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
            )
            .mount(&server)
            .await;

        let source = adapter_for(&server).await;
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::UnexpectedContent { .. }));
    }

    #[test]
    fn extract_rate_accepts_dot_decimal() {
        let (rate, raw) =
            WiseSource::extract_rate("Tipo de cambio 1 USD = 5.4123 BRL hoy").unwrap();
        assert_eq!(rate, Decimal::new(54123, 4));
        assert_eq!(raw, "1 USD = 5.4123 BRL");
    }

    #[test]
    fn declares_brl_per_usd_profile() {
        let source = WiseSource::new(Arc::new(SharedHttpResource::new(1000)));
        let profile = source.validation_profile();
        assert_eq!(profile.ordering(), PriceOrdering::BuyAboveSell);
        assert_eq!(profile.min_rate(), Decimal::new(4, 0));
        assert_eq!(source.source_id().as_str(), WISE_URL);
        assert_eq!(source.timeout_ms(), DEFAULT_SOURCE_TIMEOUT_MS);
    }
}
