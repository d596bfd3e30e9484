//! # Domain Services
//!
//! Stateless operations over quotes.
//!
//! - [`quote_validator`]: per-source plausibility checks
//! - [`statistics`]: average and slippage computation

pub mod quote_validator;
pub mod statistics;

pub use quote_validator::validate;
pub use statistics::{compute_average, compute_slippage};
