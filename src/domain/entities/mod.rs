//! # Domain Entities
//!
//! - [`Quote`]: one source's exchange-rate observation
//! - [`Average`]: cross-source mean
//! - [`Slippage`]: per-source deviation from the mean
//!
//! All three are ephemeral: created per request, never persisted.

pub mod average;
pub mod quote;
pub mod slippage;

pub use average::Average;
pub use quote::{Quote, QuoteBuilder, QuoteMetadata};
pub use slippage::{Slippage, SlippageDetails};
