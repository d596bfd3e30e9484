//! # Quote Cache
//!
//! Single-slot, time-bounded cache for the last successful collection.
//! A zero TTL disables it: nothing is ever fresh.

use crate::application::services::quote_aggregation::CollectionResult;
use parking_lot::RwLock;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Snapshot of cache state for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    /// True if a collection is stored.
    pub has_entry: bool,
    /// Age of the stored collection in milliseconds.
    pub age_ms: Option<u64>,
    /// True if the stored collection would be served.
    pub is_fresh: bool,
}

#[derive(Debug)]
struct Entry {
    result: CollectionResult,
    stored_at: Instant,
}

/// Holds at most one [`CollectionResult`].
#[derive(Debug)]
pub struct QuoteCache {
    ttl: Duration,
    entry: RwLock<Option<Entry>>,
}

impl QuoteCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Returns the configured TTL.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the stored collection if it is younger than the TTL.
    #[must_use]
    pub fn get(&self) -> Option<CollectionResult> {
        let guard = self.entry.read();
        guard
            .as_ref()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.result.clone())
    }

    /// Replaces the stored collection.
    pub fn store(&self, result: CollectionResult) {
        *self.entry.write() = Some(Entry {
            result,
            stored_at: Instant::now(),
        });
    }

    /// Drops the stored collection.
    pub fn invalidate(&self) {
        *self.entry.write() = None;
    }

    /// Reports whether an entry exists, its age and whether it is fresh.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        let guard = self.entry.read();
        match guard.as_ref() {
            Some(entry) => {
                let age = entry.stored_at.elapsed();
                CacheStatus {
                    has_entry: true,
                    age_ms: Some(u64::try_from(age.as_millis()).unwrap_or(u64::MAX)),
                    is_fresh: age < self.ttl,
                }
            }
            None => CacheStatus {
                has_entry: false,
                age_ms: None,
                is_fresh: false,
            },
        }
    }
}
