//! # Checked Arithmetic
//!
//! Traits and utilities for safe decimal arithmetic.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`round_price`] / [`round_percentage`] - Fixed-scale rounding helpers
//!
//! # Examples
//!
//! ```
//! use fx_quotes::domain::value_objects::arithmetic::{CheckedArithmetic, round_price};
//! use rust_decimal::Decimal;
//!
//! let a = Decimal::new(100, 0);
//! let b = Decimal::new(3, 0);
//! let third = a.safe_div(b).unwrap();
//! assert_eq!(round_price(third), Decimal::new(333333, 4));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places kept on prices and averages.
pub const PRICE_SCALE: u32 = 4;

/// Decimal places kept on slippage percentages.
pub const PERCENTAGE_SCALE: u32 = 2;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic operation resulted in underflow.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Trait for checked arithmetic operations.
///
/// Provides safe arithmetic methods that return `Result` instead of
/// panicking on overflow, underflow, or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Rounds a price to [`PRICE_SCALE`] places, half away from zero.
#[inline]
#[must_use]
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage to [`PERCENTAGE_SCALE`] places, half away from zero.
#[inline]
#[must_use]
pub fn round_percentage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PERCENTAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_correctly() {
        assert_eq!(ArithmeticError::Overflow.to_string(), "arithmetic overflow");
        assert_eq!(
            ArithmeticError::DivisionByZero.to_string(),
            "division by zero"
        );
    }

    #[test]
    fn safe_div_by_zero_fails() {
        let result = Decimal::ONE.safe_div(Decimal::ZERO);
        assert_eq!(result, Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    fn safe_add_overflow_fails() {
        assert_eq!(
            Decimal::MAX.safe_add(Decimal::ONE),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn safe_mul_and_sub() {
        let product = Decimal::new(5, 0).safe_mul(Decimal::new(1005, 3)).unwrap();
        assert_eq!(product, Decimal::new(5025, 3));
        let diff = Decimal::new(5, 0).safe_sub(Decimal::new(25, 1)).unwrap();
        assert_eq!(diff, Decimal::new(25, 1));
    }

    #[test]
    fn round_price_midpoint_goes_away_from_zero() {
        assert_eq!(round_price(Decimal::new(512345, 5)), Decimal::new(51235, 4));
        assert_eq!(round_price(Decimal::new(-512345, 5)), Decimal::new(-51235, 4));
        assert_eq!(round_price(Decimal::new(51, 1)), Decimal::new(51, 1));
    }

    #[test]
    fn round_percentage_two_places() {
        // 0.980392... -> 0.98
        let pct = Decimal::new(5, 2)
            .safe_div(Decimal::new(51, 1))
            .unwrap()
            .safe_mul(Decimal::ONE_HUNDRED)
            .unwrap();
        assert_eq!(round_percentage(pct), Decimal::new(98, 2));
    }
}
