//! # Identifiers
//!
//! String-based identifier for quote sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the source a quote came from.
///
/// By convention this is the URL the adapter reads, which keeps it unique
/// per adapter and doubles as provenance in API responses.
///
/// # Examples
///
/// ```
/// use fx_quotes::domain::value_objects::SourceId;
///
/// let id = SourceId::new("https://www.nomadglobal.com");
/// assert_eq!(id.as_str(), "https://www.nomadglobal.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Creates a new source identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
