//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`SourceId`]: identifier of a quote source
//! - [`Timestamp`]: UTC instant
//! - [`ValidationProfile`] / [`PriceOrdering`]: per-source plausibility rules
//! - [`CheckedArithmetic`]: safe decimal arithmetic and rounding helpers

pub mod arithmetic;
pub mod ids;
pub mod timestamp;
pub mod validation_profile;

pub use arithmetic::{
    round_percentage, round_price, ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
pub use ids::SourceId;
pub use timestamp::Timestamp;
pub use validation_profile::{PriceOrdering, ValidationProfile};
