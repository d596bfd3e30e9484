//! # Domain Layer
//!
//! Quote model, plausibility rules and the statistics derived from quotes.
//! Nothing here performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
