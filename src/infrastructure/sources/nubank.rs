//! # Nubank Source
//!
//! Reads the most recent row of Nubank's published card conversion table.
//! The first cell is the reference date and the second is the rate, which
//! Nubank applies to both directions.

use crate::domain::entities::{Quote, QuoteMetadata};
use crate::domain::value_objects::arithmetic::round_price;
use crate::domain::value_objects::{PriceOrdering, SourceId, ValidationProfile};
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::extract::{first_table_row_cells, parse_localized_decimal};
use crate::infrastructure::sources::shared_client::HttpResource;
use crate::infrastructure::sources::traits::{SourceAdapter, DEFAULT_SOURCE_TIMEOUT_MS};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Default open-data page.
pub const NUBANK_URL: &str = "https://nubank.com.br/dados-abertos/taxas-conversao";

const NUBANK_NOTE: &str = "Rate for international credit card purchases";

/// Nubank conversion table adapter.
#[derive(Debug, Clone)]
pub struct NubankSource {
    source_id: SourceId,
    url: String,
    timeout_ms: u64,
    resource: Arc<dyn HttpResource>,
}

impl NubankSource {
    /// Creates the adapter against the public conversion table.
    #[must_use]
    pub fn new(resource: Arc<dyn HttpResource>) -> Self {
        Self {
            source_id: SourceId::new(NUBANK_URL),
            url: NUBANK_URL.to_string(),
            timeout_ms: DEFAULT_SOURCE_TIMEOUT_MS,
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
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.8"));
        headers
    }

    /// Returns `(date, rate, rate cell text)`.
    fn parse_row(cells: &[String]) -> SourceResult<(String, Decimal, String)> {
        let (Some(date), Some(rate_text)) = (cells.first(), cells.get(1)) else {
            return Err(SourceError::unexpected_content(format!(
                "conversion row has {} cells, expected at least 2",
                cells.len()
            )));
        };

        let rate = parse_localized_decimal(rate_text).ok_or_else(|| {
            SourceError::unexpected_content(format!(
                "could not parse conversion rate: \"{rate_text}\""
            ))
        })?;

        Ok((date.clone(), rate, rate_text.clone()))
    }
}

#[async_trait]
impl SourceAdapter for NubankSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    fn name(&self) -> &str {
        "Nubank"
    }

    fn validation_profile(&self) -> ValidationProfile {
        ValidationProfile::brl_per_usd(PriceOrdering::Unordered)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    async fn fetch(&self) -> SourceResult<Quote> {
        let client = self.resource.acquire()?;
        let html = client
            .get_text(&self.url, self.timeout(), Self::page_headers())
            .await?;

        let cells = first_table_row_cells(&html)?
            .ok_or_else(|| SourceError::unexpected_content("conversion table has no rows"))?;
        let (date, rate, raw_text) = Self::parse_row(&cells)?;
        let price = round_price(rate);

        tracing::debug!(source = %self.source_id, %date, %price, "nubank rate extracted");

        let metadata = QuoteMetadata::new()
            .reference_date(date)
            .raw_text(raw_text)
            .currency_pair("USD/BRL")
            .provider("Nubank")
            .note(NUBANK_NOTE);

        Ok(Quote::new(price, price, self.source_id.clone())?.with_metadata(metadata))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::sources::shared_client::SharedHttpResource;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TABLE: &str = r#"<html><body>
        <table>
          <thead><tr><th>Data</th><th>Taxa de conversão</th></tr></thead>
          <tbody>
            <tr><td>15/01/2025</td><td>R$ 6,1234</td></tr>
            <tr><td>14/01/2025</td><td>6,0999</td></tr>
          </tbody>
        </table></body></html>"#;

    fn adapter_for(server: &MockServer) -> NubankSource {
        NubankSource::new(Arc::new(SharedHttpResource::new(5000)))
            .with_url(format!("{}/taxas", server.uri()))
    }

    async fn serve(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/taxas"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_reads_first_row() {
        let server = MockServer::start().await;
        serve(&server, &TABLE.replace("R$ 6,1234", "6,1234")).await;

        let quote = adapter_for(&server).fetch().await.unwrap();
        assert_eq!(quote.buy_price(), Decimal::new(61234, 4));
        assert_eq!(quote.sell_price(), quote.buy_price());
        assert_eq!(quote.metadata().reference_date.as_deref(), Some("15/01/2025"));
        assert_eq!(quote.metadata().note.as_deref(), Some(NUBANK_NOTE));
        assert_eq!(quote.metadata().raw_text.as_deref(), Some("6,1234"));
    }

    #[tokio::test]
    async fn equal_prices_pass_validation() {
        let server = MockServer::start().await;
        serve(&server, &TABLE.replace("R$ 6,1234", "5.5")).await;

        let source = adapter_for(&server);
        let quote = source.fetch().await.unwrap();
        assert!(crate::domain::services::validate(&quote, &source.validation_profile()).is_ok());
    }

    #[tokio::test]
    async fn unparseable_rate_is_unexpected_content() {
        let server = MockServer::start().await;
        serve(&server, TABLE).await;

        let err = adapter_for(&server).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::UnexpectedContent { .. }));
    }

    #[tokio::test]
    async fn empty_table_is_unexpected_content() {
        let server = MockServer::start().await;
        serve(&server, "<table><tbody></tbody></table>").await;

        let err = adapter_for(&server).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::UnexpectedContent { .. }));
    }

    #[test]
    fn short_row_is_rejected() {
        let err = NubankSource::parse_row(&["15/01/2025".to_string()]).unwrap_err();
        assert!(err.to_string().contains("expected at least 2"));
    }
}
