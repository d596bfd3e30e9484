//! # Slippage Entity
//!
//! Per-source deviation from the cross-source average.

use crate::domain::value_objects::{SourceId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs a slippage figure was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageDetails {
    /// The source's buy price.
    #[serde(with = "rust_decimal::serde::float")]
    pub quote_buy_price: Decimal,
    /// The source's sell price.
    #[serde(with = "rust_decimal::serde::float")]
    pub quote_sell_price: Decimal,
    /// The average buy price compared against.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_buy_price: Decimal,
    /// The average sell price compared against.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_sell_price: Decimal,
    /// Provider name from quote metadata, if the adapter reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Percentage deviation of one source's prices from the average.
///
/// Positive values mean the source is above the mean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slippage {
    #[serde(with = "rust_decimal::serde::float")]
    buy_price_slippage_pct: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    sell_price_slippage_pct: Decimal,
    source: SourceId,
    timestamp: Timestamp,
    details: SlippageDetails,
}

impl Slippage {
    pub(crate) fn new(
        buy_price_slippage_pct: Decimal,
        sell_price_slippage_pct: Decimal,
        source: SourceId,
        timestamp: Timestamp,
        details: SlippageDetails,
    ) -> Self {
        Self {
            buy_price_slippage_pct,
            sell_price_slippage_pct,
            source,
            timestamp,
            details,
        }
    }

    /// Buy price deviation in percent, 2 decimal places.
    #[inline]
    #[must_use]
    pub fn buy_price_slippage_pct(&self) -> Decimal {
        self.buy_price_slippage_pct
    }

    /// Sell price deviation in percent, 2 decimal places.
    #[inline]
    #[must_use]
    pub fn sell_price_slippage_pct(&self) -> Decimal {
        self.sell_price_slippage_pct
    }

    /// The source this figure refers to.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// When the figure was computed.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Inputs used for the computation.
    #[inline]
    #[must_use]
    pub fn details(&self) -> &SlippageDetails {
        &self.details
    }
}
