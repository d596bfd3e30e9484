//! # Shared HTTP Resource
//!
//! Process-wide HTTP client handle with an explicit lifecycle.
//!
//! ```text
//! (idle) --acquire--> (active) --release--> (idle)
//!                       ^  |
//!                       +--+ acquire returns the same client
//! ```
//!
//! The client is created on first [`HttpResource::acquire`] and dropped by
//! [`HttpResource::release`], which the binary calls on shutdown. Adapters
//! receive the resource as `Arc<dyn HttpResource>` so tests can inject
//! their own implementation.

use crate::infrastructure::sources::error::SourceResult;
use crate::infrastructure::sources::http_client::HttpClient;
use parking_lot::Mutex;
use std::fmt;

/// Lifecycle-managed access to the shared HTTP client.
pub trait HttpResource: Send + Sync + fmt::Debug {
    /// Returns the shared client, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the client cannot be created.
    fn acquire(&self) -> SourceResult<HttpClient>;

    /// Drops the shared client. Later calls to `acquire` create a new one.
    fn release(&self);

    /// Returns true if a client currently exists.
    fn is_active(&self) -> bool;
}

/// Default [`HttpResource`] backed by a lazily created [`HttpClient`].
pub struct SharedHttpResource {
    default_timeout_ms: u64,
    client: Mutex<Option<HttpClient>>,
}

impl SharedHttpResource {
    /// Creates an idle resource; no client exists until first use.
    #[must_use]
    pub fn new(default_timeout_ms: u64) -> Self {
        Self {
            default_timeout_ms,
            client: Mutex::new(None),
        }
    }
}

impl fmt::Debug for SharedHttpResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHttpResource")
            .field("default_timeout_ms", &self.default_timeout_ms)
            .field("active", &self.is_active())
            .finish()
    }
}

impl HttpResource for SharedHttpResource {
    fn acquire(&self) -> SourceResult<HttpClient> {
        let mut guard = self.client.lock();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = HttpClient::new(self.default_timeout_ms)?;
        tracing::info!(timeout_ms = self.default_timeout_ms, "shared HTTP client created");
        *guard = Some(client.clone());
        Ok(client)
    }

    fn release(&self) {
        if self.client.lock().take().is_some() {
            tracing::info!("shared HTTP client released");
        }
    }

    fn is_active(&self) -> bool {
        self.client.lock().is_some()
    }
}
