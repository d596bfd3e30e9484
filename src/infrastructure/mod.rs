//! # Infrastructure Layer
//!
//! Adapters to the outside world: the quote sources and the HTTP client
//! they share.

pub mod sources;
