//! # Source Adapter Trait
//!
//! Port definition for quote sources.
//!
//! Every external source (scraped page or JSON API) implements
//! [`SourceAdapter`]. The aggregation engine only ever sees this trait: it
//! asks for one quote, applies the adapter's declared timeout and
//! [`ValidationProfile`], and retries on failure.
//!
//! # Examples
//!
//! ```ignore
//! use fx_quotes::infrastructure::sources::traits::SourceAdapter;
//! use fx_quotes::infrastructure::sources::error::SourceResult;
//!
//! struct MySource { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl SourceAdapter for MySource {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::Quote;
use crate::domain::value_objects::{SourceId, ValidationProfile};
use crate::infrastructure::sources::error::SourceResult;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Default per-attempt timeout for page-style sources.
pub const DEFAULT_SOURCE_TIMEOUT_MS: u64 = 30_000;

/// A source of USD/BRL quotes.
///
/// # Contract
///
/// - `fetch` returns a fully populated quote with prices rounded to 4 places,
///   or an error. It never returns partial data.
/// - `fetch` must not share per-request state with other adapters.
/// - `source_id` is stable and unique across configured adapters.
#[async_trait]
pub trait SourceAdapter: Send + Sync + fmt::Debug {
    /// Returns the source identifier stamped on quotes.
    fn source_id(&self) -> &SourceId;

    /// Returns a short human-readable name used in logs.
    fn name(&self) -> &str;

    /// Returns the plausibility rules quotes from this source must pass.
    fn validation_profile(&self) -> ValidationProfile;

    /// Returns the per-attempt timeout in milliseconds.
    fn timeout_ms(&self) -> u64 {
        DEFAULT_SOURCE_TIMEOUT_MS
    }

    /// Returns the per-attempt timeout as a `Duration`.
    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms())
    }

    /// Acquires one quote from the source.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the source cannot be reached or its
    /// response cannot be turned into a quote.
    async fn fetch(&self) -> SourceResult<Quote>;
}
