//! # Quote Entity
//!
//! One source's exchange-rate observation.
//!
//! # Examples
//!
//! ```
//! use fx_quotes::domain::entities::quote::{Quote, QuoteMetadata};
//! use fx_quotes::domain::value_objects::SourceId;
//! use rust_decimal::Decimal;
//!
//! let quote = Quote::new(
//!     Decimal::new(54123, 4),
//!     Decimal::new(53587, 4),
//!     SourceId::new("https://wise.com"),
//! )
//! .unwrap()
//! .with_metadata(QuoteMetadata::new().provider("Wise").currency_pair("USD/BRL"));
//!
//! assert_eq!(quote.metadata().provider.as_deref(), Some("Wise"));
//! ```

use crate::domain::errors::{DomainError, DomainResult, PriceField};
use crate::domain::value_objects::{SourceId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source-specific context attached to a quote.
///
/// Every field is optional; downstream logic never depends on any of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteMetadata {
    /// Reference rate before spread/tax adjustments.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub mid_market_rate: Option<Decimal>,
    /// Spread applied on top of the mid-market rate, in percent.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub spread_percentage: Option<Decimal>,
    /// Raw text the rate was extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    /// Currency pair label, e.g. `USD/BRL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_pair: Option<String>,
    /// Human-readable provider name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Date the source publishes the rate for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,
}

impl QuoteMetadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mid-market rate.
    #[must_use]
    pub fn mid_market_rate(mut self, rate: Decimal) -> Self {
        self.mid_market_rate = Some(rate);
        self
    }

    /// Sets the spread percentage.
    #[must_use]
    pub fn spread_percentage(mut self, pct: Decimal) -> Self {
        self.spread_percentage = Some(pct);
        self
    }

    /// Sets the raw extracted text.
    #[must_use]
    pub fn raw_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = Some(text.into());
        self
    }

    /// Sets the currency pair label.
    #[must_use]
    pub fn currency_pair(mut self, pair: impl Into<String>) -> Self {
        self.currency_pair = Some(pair.into());
        self
    }

    /// Sets the provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the note.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the reference date.
    #[must_use]
    pub fn reference_date(mut self, date: impl Into<String>) -> Self {
        self.reference_date = Some(date.into());
        self
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An exchange-rate observation from one source.
///
/// # Invariants
///
/// - [`Quote::new`] only accepts positive prices.
/// - [`QuoteBuilder::build`] does not check anything; quotes built that way
///   must go through the quote validator before they are trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(with = "rust_decimal::serde::float")]
    buy_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    sell_price: Decimal,
    source: SourceId,
    timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "QuoteMetadata::is_empty")]
    metadata: QuoteMetadata,
}

impl Quote {
    /// Creates a new quote stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NonPositivePrice` if either price is not positive.
    pub fn new(buy_price: Decimal, sell_price: Decimal, source: SourceId) -> DomainResult<Self> {
        Self::validate_positive(PriceField::Buy, buy_price)?;
        Self::validate_positive(PriceField::Sell, sell_price)?;

        Ok(Self {
            buy_price,
            sell_price,
            source,
            timestamp: Timestamp::now(),
            metadata: QuoteMetadata::default(),
        })
    }

    /// Returns a builder for constructing a quote.
    #[must_use]
    pub fn builder(buy_price: Decimal, sell_price: Decimal, source: SourceId) -> QuoteBuilder {
        QuoteBuilder::new(buy_price, sell_price, source)
    }

    fn validate_positive(field: PriceField, value: Decimal) -> DomainResult<()> {
        if value <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice { field, value });
        }
        Ok(())
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: QuoteMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the buy price.
    #[inline]
    #[must_use]
    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    /// Returns the sell price.
    #[inline]
    #[must_use]
    pub fn sell_price(&self) -> Decimal {
        self.sell_price
    }

    /// Returns the source identifier.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Returns the acquisition time.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the metadata.
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &QuoteMetadata {
        &self.metadata
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote(buy {} / sell {} from {})",
            self.buy_price, self.sell_price, self.source
        )
    }
}

/// Builder for [`Quote`] that performs no validation.
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
    buy_price: Decimal,
    sell_price: Decimal,
    source: SourceId,
    timestamp: Option<Timestamp>,
    metadata: QuoteMetadata,
}

impl QuoteBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(buy_price: Decimal, sell_price: Decimal, source: SourceId) -> Self {
        Self {
            buy_price,
            sell_price,
            source,
            timestamp: None,
            metadata: QuoteMetadata::default(),
        }
    }

    /// Sets the acquisition time (defaults to now).
    #[must_use]
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: QuoteMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds the quote.
    #[must_use]
    pub fn build(self) -> Quote {
        Quote {
            buy_price: self.buy_price,
            sell_price: self.sell_price,
            source: self.source,
            timestamp: self.timestamp.unwrap_or_else(Timestamp::now),
            metadata: self.metadata,
        }
    }
}
