//! # Domain Errors
//!
//! Error types for business rule violations.
//!
//! [`DomainError`] covers everything the quote validator and the statistics
//! functions can reject: implausible prices, broken ordering rules, empty
//! inputs and arithmetic failures.
//!
//! # Examples
//!
//! ```
//! use fx_quotes::domain::errors::{DomainError, PriceField};
//! use rust_decimal::Decimal;
//!
//! let err = DomainError::NonPositivePrice {
//!     field: PriceField::Buy,
//!     value: Decimal::NEGATIVE_ONE,
//! };
//! assert!(err.to_string().contains("buy_price"));
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::validation_profile::PriceOrdering;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Identifies which price of a quote a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    /// The buy price.
    Buy,
    /// The sell price.
    Sell,
}

impl PriceField {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy_price",
            Self::Sell => "sell_price",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A price was zero or negative.
    #[error("invalid {field}: {value} (must be positive)")]
    NonPositivePrice {
        /// Offending field.
        field: PriceField,
        /// Offending value.
        value: Decimal,
    },

    /// A price fell outside the source's plausibility envelope.
    #[error("{field} {value} outside reasonable range [{min}, {max}]")]
    OutsideEnvelope {
        /// Offending field.
        field: PriceField,
        /// Offending value.
        value: Decimal,
        /// Lower bound (inclusive).
        min: Decimal,
        /// Upper bound (inclusive).
        max: Decimal,
    },

    /// Buy and sell prices are not in the order the source declares.
    #[error("price ordering violated: expected {expected}, got buy {buy} and sell {sell}")]
    PriceOrderingViolated {
        /// Declared ordering.
        expected: PriceOrdering,
        /// Buy price seen.
        buy: Decimal,
        /// Sell price seen.
        sell: Decimal,
    },

    /// A validation profile was declared with unusable bounds.
    #[error("invalid validation profile: {0}")]
    InvalidProfile(String),

    /// A statistic was requested over zero quotes.
    #[error("cannot calculate average: no quotes available")]
    EmptyQuoteSet,

    /// A reference price used as divisor was zero.
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),

    /// Checked arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Returns true if the error came from quote plausibility checks.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NonPositivePrice { .. }
                | Self::OutsideEnvelope { .. }
                | Self::PriceOrderingViolated { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
