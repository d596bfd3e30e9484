//! # Validation Profile
//!
//! Per-source plausibility rules consumed by the quote validator.
//!
//! Every source adapter declares one [`ValidationProfile`]: the inclusive
//! rate envelope its currency-pair convention lives in, and which of the two
//! prices must be the larger one.
//!
//! # Examples
//!
//! ```
//! use fx_quotes::domain::value_objects::validation_profile::{PriceOrdering, ValidationProfile};
//! use rust_decimal::Decimal;
//!
//! let profile = ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell);
//! assert!(profile.contains(Decimal::new(55, 1)));
//! assert!(!profile.contains(Decimal::new(50, 0)));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Required relation between buy and sell price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceOrdering {
    /// `buy_price` must be strictly greater than `sell_price`.
    BuyAboveSell,
    /// `sell_price` must be strictly greater than `buy_price`.
    SellAboveBuy,
    /// No ordering is enforced (e.g. a single published rate).
    #[default]
    Unordered,
}

impl PriceOrdering {
    /// Returns true if the given prices satisfy this ordering.
    #[must_use]
    pub fn is_satisfied_by(&self, buy: Decimal, sell: Decimal) -> bool {
        match self {
            Self::BuyAboveSell => buy > sell,
            Self::SellAboveBuy => sell > buy,
            Self::Unordered => true,
        }
    }
}

impl fmt::Display for PriceOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyAboveSell => write!(f, "buy_price > sell_price"),
            Self::SellAboveBuy => write!(f, "sell_price > buy_price"),
            Self::Unordered => write!(f, "any ordering"),
        }
    }
}

/// Plausibility envelope and ordering rule for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationProfile {
    min_rate: Decimal,
    max_rate: Decimal,
    ordering: PriceOrdering,
}

impl ValidationProfile {
    /// Creates a profile.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidProfile` if `min_rate` is not positive or
    /// exceeds `max_rate`.
    pub fn new(
        min_rate: Decimal,
        max_rate: Decimal,
        ordering: PriceOrdering,
    ) -> DomainResult<Self> {
        if min_rate <= Decimal::ZERO {
            return Err(DomainError::InvalidProfile(format!(
                "min_rate must be positive, got {min_rate}"
            )));
        }
        if min_rate > max_rate {
            return Err(DomainError::InvalidProfile(format!(
                "min_rate {min_rate} exceeds max_rate {max_rate}"
            )));
        }
        Ok(Self {
            min_rate,
            max_rate,
            ordering,
        })
    }

    /// Envelope for sources quoting BRL per 1 USD: `[4.0, 7.0]`.
    #[must_use]
    pub const fn brl_per_usd(ordering: PriceOrdering) -> Self {
        Self {
            min_rate: Decimal::from_parts(40, 0, 0, false, 1),
            max_rate: Decimal::from_parts(70, 0, 0, false, 1),
            ordering,
        }
    }

    /// Envelope for sources quoting USD per 1 BRL: `[0.10, 0.30]`.
    #[must_use]
    pub const fn usd_per_brl(ordering: PriceOrdering) -> Self {
        Self {
            min_rate: Decimal::from_parts(10, 0, 0, false, 2),
            max_rate: Decimal::from_parts(30, 0, 0, false, 2),
            ordering,
        }
    }

    /// Lower bound (inclusive).
    #[inline]
    #[must_use]
    pub const fn min_rate(&self) -> Decimal {
        self.min_rate
    }

    /// Upper bound (inclusive).
    #[inline]
    #[must_use]
    pub const fn max_rate(&self) -> Decimal {
        self.max_rate
    }

    /// Declared buy/sell ordering.
    #[inline]
    #[must_use]
    pub const fn ordering(&self) -> PriceOrdering {
        self.ordering
    }

    /// Returns true if `rate` lies inside the envelope.
    #[must_use]
    pub fn contains(&self, rate: Decimal) -> bool {
        rate >= self.min_rate && rate <= self.max_rate
    }
}
