//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`QuoteAggregationEngine`]: concurrent collection, average and slippage
//! - [`RetryPolicy`]: bounded retries with exponential backoff per source
//! - [`QuoteCache`]: optional time-bounded cache of the last collection

pub mod quote_aggregation;
pub mod quote_cache;
pub mod retry;

pub use quote_aggregation::{
    AggregationError, AggregationResult, CollectionResult, QuoteAggregationEngine, SourceFailure,
};
pub use quote_cache::{CacheStatus, QuoteCache};
pub use retry::{RetryConfig, RetryExhausted, RetryOutcome, RetryPolicy};
