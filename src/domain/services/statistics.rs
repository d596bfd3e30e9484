//! # Quote Statistics
//!
//! Average and slippage computation over a set of quotes.
//!
//! ```text
//! average_price = round4( Σ price / n )
//! slippage_pct  = round2( (price − average) / average × 100 )
//! ```
//!
//! Both functions are pure apart from stamping the computation time.
//!
//! # Examples
//!
//! ```
//! use fx_quotes::domain::entities::Quote;
//! use fx_quotes::domain::services::statistics::{compute_average, compute_slippage};
//! use fx_quotes::domain::value_objects::SourceId;
//! use rust_decimal::Decimal;
//!
//! let quotes = vec![
//!     Quote::new(Decimal::new(50000, 4), Decimal::new(49000, 4), SourceId::new("a")).unwrap(),
//!     Quote::new(Decimal::new(52000, 4), Decimal::new(51000, 4), SourceId::new("b")).unwrap(),
//! ];
//! let average = compute_average(&quotes).unwrap();
//! assert_eq!(average.average_buy_price(), Decimal::new(51000, 4));
//! assert_eq!(average.average_sell_price(), Decimal::new(50000, 4));
//!
//! let slippage = compute_slippage(&quotes, &average).unwrap();
//! assert_eq!(slippage.len(), 2);
//! ```

use crate::domain::entities::{Average, Quote, Slippage, SlippageDetails};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::{round_percentage, round_price, CheckedArithmetic};
use crate::domain::value_objects::Timestamp;
use rust_decimal::Decimal;

/// Computes the arithmetic mean of buy and sell prices.
///
/// # Errors
///
/// - `DomainError::EmptyQuoteSet` if `quotes` is empty
/// - `DomainError::Arithmetic` on overflow
pub fn compute_average(quotes: &[Quote]) -> DomainResult<Average> {
    if quotes.is_empty() {
        return Err(DomainError::EmptyQuoteSet);
    }

    let mut total_buy = Decimal::ZERO;
    let mut total_sell = Decimal::ZERO;
    for quote in quotes {
        total_buy = total_buy.safe_add(quote.buy_price())?;
        total_sell = total_sell.safe_add(quote.sell_price())?;
    }

    let count = Decimal::from(quotes.len());
    let average_buy = round_price(total_buy.safe_div(count)?);
    let average_sell = round_price(total_sell.safe_div(count)?);

    let sources = quotes.iter().map(|q| q.source().clone()).collect();

    Ok(Average::new(average_buy, average_sell, sources, Timestamp::now()))
}

/// Computes each quote's deviation from `average`, preserving input order.
///
/// # Errors
///
/// - `DomainError::DivisionByZero` if either average price is zero
/// - `DomainError::Arithmetic` on overflow
pub fn compute_slippage(quotes: &[Quote], average: &Average) -> DomainResult<Vec<Slippage>> {
    let avg_buy = average.average_buy_price();
    let avg_sell = average.average_sell_price();

    if avg_buy.is_zero() {
        return Err(DomainError::DivisionByZero("average_buy_price is zero"));
    }
    if avg_sell.is_zero() {
        return Err(DomainError::DivisionByZero("average_sell_price is zero"));
    }

    let now = Timestamp::now();

    quotes
        .iter()
        .map(|quote| {
            let buy_pct = deviation_pct(quote.buy_price(), avg_buy)?;
            let sell_pct = deviation_pct(quote.sell_price(), avg_sell)?;

            let details = SlippageDetails {
                quote_buy_price: quote.buy_price(),
                quote_sell_price: quote.sell_price(),
                average_buy_price: avg_buy,
                average_sell_price: avg_sell,
                provider: quote.metadata().provider.clone(),
            };

            Ok(Slippage::new(
                buy_pct,
                sell_pct,
                quote.source().clone(),
                now,
                details,
            ))
        })
        .collect()
}

fn deviation_pct(price: Decimal, reference: Decimal) -> DomainResult<Decimal> {
    let pct = price
        .safe_sub(reference)?
        .safe_div(reference)?
        .safe_mul(Decimal::ONE_HUNDRED)?;
    Ok(round_percentage(pct))
}
