//! # Quote Validator
//!
//! Rejects quotes that parsed cleanly but make no sense.
//!
//! One implementation serves every source; what differs per source is the
//! [`ValidationProfile`] it declares.
//!
//! # Check order
//!
//! ```text
//! positive prices → envelope (buy, then sell) → declared ordering
//! ```
//!
//! # Examples
//!
//! ```
//! use fx_quotes::domain::entities::Quote;
//! use fx_quotes::domain::services::quote_validator::validate;
//! use fx_quotes::domain::value_objects::{PriceOrdering, SourceId, ValidationProfile};
//! use rust_decimal::Decimal;
//!
//! let profile = ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell);
//! let quote =
//!     Quote::builder(Decimal::new(50, 0), Decimal::new(49, 0), SourceId::new("x")).build();
//! assert!(validate(&quote, &profile).is_err());
//! ```

use crate::domain::entities::Quote;
use crate::domain::errors::{DomainError, DomainResult, PriceField};
use crate::domain::value_objects::ValidationProfile;
use rust_decimal::Decimal;

/// Validates a quote against a source's profile.
///
/// # Errors
///
/// - `DomainError::NonPositivePrice` if either price is zero or negative
/// - `DomainError::OutsideEnvelope` if either price is outside the profile's range
/// - `DomainError::PriceOrderingViolated` if the declared ordering does not hold
pub fn validate(quote: &Quote, profile: &ValidationProfile) -> DomainResult<()> {
    let buy = quote.buy_price();
    let sell = quote.sell_price();

    check_positive(PriceField::Buy, buy)?;
    check_positive(PriceField::Sell, sell)?;

    check_envelope(PriceField::Buy, buy, profile)?;
    check_envelope(PriceField::Sell, sell, profile)?;

    let ordering = profile.ordering();
    if !ordering.is_satisfied_by(buy, sell) {
        return Err(DomainError::PriceOrderingViolated {
            expected: ordering,
            buy,
            sell,
        });
    }

    Ok(())
}

fn check_positive(field: PriceField, value: Decimal) -> DomainResult<()> {
    if value <= Decimal::ZERO {
        return Err(DomainError::NonPositivePrice { field, value });
    }
    Ok(())
}

fn check_envelope(
    field: PriceField,
    value: Decimal,
    profile: &ValidationProfile,
) -> DomainResult<()> {
    if !profile.contains(value) {
        return Err(DomainError::OutsideEnvelope {
            field,
            value,
            min: profile.min_rate(),
            max: profile.max_rate(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{PriceOrdering, SourceId};

    fn quote(buy: Decimal, sell: Decimal) -> Quote {
        Quote::builder(buy, sell, SourceId::new("test-source")).build()
    }

    fn all_profiles() -> Vec<ValidationProfile> {
        vec![
            ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell),
            ValidationProfile::brl_per_usd(PriceOrdering::Unordered),
            ValidationProfile::usd_per_brl(PriceOrdering::SellAboveBuy),
        ]
    }

    #[test]
    fn accepts_plausible_quote() {
        let profile = ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell);
        assert!(validate(&quote(Decimal::new(54123, 4), Decimal::new(53587, 4)), &profile).is_ok());
    }

    #[test]
    fn rejects_negative_buy_price_for_every_profile() {
        for profile in all_profiles() {
            let err =
                validate(&quote(Decimal::NEGATIVE_ONE, Decimal::new(5, 0)), &profile).unwrap_err();
            assert!(matches!(
                err,
                DomainError::NonPositivePrice {
                    field: PriceField::Buy,
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_zero_sell_price() {
        let profile = ValidationProfile::brl_per_usd(PriceOrdering::Unordered);
        let err = validate(&quote(Decimal::new(5, 0), Decimal::ZERO), &profile).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NonPositivePrice {
                field: PriceField::Sell,
                ..
            }
        ));
    }

    #[test]
    fn rejects_price_outside_envelope() {
        let profile = ValidationProfile::brl_per_usd(PriceOrdering::Unordered);
        let err = validate(&quote(Decimal::new(50, 0), Decimal::new(50, 0)), &profile).unwrap_err();
        match err {
            DomainError::OutsideEnvelope {
                field, value, min, max,
            } => {
                assert_eq!(field, PriceField::Buy);
                assert_eq!(value, Decimal::new(50, 0));
                assert_eq!(min, Decimal::new(4, 0));
                assert_eq!(max, Decimal::new(7, 0));
            }
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sell_checked_against_envelope_too() {
        let profile = ValidationProfile::brl_per_usd(PriceOrdering::Unordered);
        let err = validate(&quote(Decimal::new(5, 0), Decimal::new(39, 1)), &profile).unwrap_err();
        assert!(matches!(
            err,
            DomainError::OutsideEnvelope {
                field: PriceField::Sell,
                ..
            }
        ));
    }

    #[test]
    fn brl_rate_fails_usd_per_brl_envelope() {
        let profile = ValidationProfile::usd_per_brl(PriceOrdering::SellAboveBuy);
        let err = validate(&quote(Decimal::new(54, 1), Decimal::new(55, 1)), &profile).unwrap_err();
        assert!(matches!(err, DomainError::OutsideEnvelope { .. }));
    }

    #[test]
    fn rejects_wrong_ordering() {
        let profile = ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell);
        let err = validate(&quote(Decimal::new(53, 1), Decimal::new(54, 1)), &profile).unwrap_err();
        assert!(matches!(
            err,
            DomainError::PriceOrderingViolated {
                expected: PriceOrdering::BuyAboveSell,
                ..
            }
        ));

        let profile = ValidationProfile::usd_per_brl(PriceOrdering::SellAboveBuy);
        let err = validate(&quote(Decimal::new(19, 2), Decimal::new(18, 2)), &profile).unwrap_err();
        assert!(matches!(err, DomainError::PriceOrderingViolated { .. }));
    }

    #[test]
    fn equal_prices_allowed_when_unordered() {
        let profile = ValidationProfile::brl_per_usd(PriceOrdering::Unordered);
        assert!(validate(&quote(Decimal::new(55, 1), Decimal::new(55, 1)), &profile).is_ok());

        let strict = ValidationProfile::brl_per_usd(PriceOrdering::BuyAboveSell);
        assert!(validate(&quote(Decimal::new(55, 1), Decimal::new(55, 1)), &strict).is_err());
    }
}
