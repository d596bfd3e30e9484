//! # Average Entity
//!
//! Cross-source summary of the quotes gathered in one collection.

use crate::domain::value_objects::{SourceId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label reported for the only supported calculation.
pub const ARITHMETIC_MEAN: &str = "arithmetic_mean";

/// Arithmetic mean of buy and sell prices across sources.
///
/// # Invariants
///
/// - `sources_count >= 1` and equals `contributing_sources.len()`
///
/// Built only by the statistics service, which refuses empty inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Average {
    #[serde(with = "rust_decimal::serde::float")]
    average_buy_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    average_sell_price: Decimal,
    sources_count: usize,
    timestamp: Timestamp,
    contributing_sources: Vec<SourceId>,
    calculation_method: String,
}

impl Average {
    pub(crate) fn new(
        average_buy_price: Decimal,
        average_sell_price: Decimal,
        contributing_sources: Vec<SourceId>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            average_buy_price,
            average_sell_price,
            sources_count: contributing_sources.len(),
            timestamp,
            contributing_sources,
            calculation_method: ARITHMETIC_MEAN.to_string(),
        }
    }

    /// Mean buy price, 4 decimal places.
    #[inline]
    #[must_use]
    pub fn average_buy_price(&self) -> Decimal {
        self.average_buy_price
    }

    /// Mean sell price, 4 decimal places.
    #[inline]
    #[must_use]
    pub fn average_sell_price(&self) -> Decimal {
        self.average_sell_price
    }

    /// Number of quotes the mean was computed over.
    #[inline]
    #[must_use]
    pub fn sources_count(&self) -> usize {
        self.sources_count
    }

    /// When the mean was computed.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Sources that contributed, in quote order.
    #[inline]
    #[must_use]
    pub fn contributing_sources(&self) -> &[SourceId] {
        &self.contributing_sources
    }

    /// Calculation method label.
    #[inline]
    #[must_use]
    pub fn calculation_method(&self) -> &str {
        &self.calculation_method
    }
}
