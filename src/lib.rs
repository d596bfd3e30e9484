//! # fx-quotes
//!
//! USD/BRL quote aggregation service.
//!
//! Quotes are collected concurrently from several public sources, each with
//! bounded retries and exponential backoff. Every quote is checked against
//! its source's plausibility rules, and a collection succeeds as long as one
//! source answers. On top of the collection the service computes the
//! cross-source average and each source's slippage from it.
//!
//! # Architecture
//!
//! ```text
//! api::rest ──► application::services ──► domain
//!                    │
//!                    └──► infrastructure::sources ──► HTTP
//! ```
//!
//! - [`domain`]: quotes, validation profiles, average and slippage math
//! - [`application`]: retry policy, aggregation engine, optional cache
//! - [`infrastructure`]: source adapters and the shared HTTP client
//! - [`api`]: axum router
//! - [`config`] / [`telemetry`]: settings and logging

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
