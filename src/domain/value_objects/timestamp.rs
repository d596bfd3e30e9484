//! # Timestamp Value Object
//!
//! UTC instant used for quote acquisition and statistic computation times.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use fx_quotes::domain::value_objects::timestamp::Timestamp;
//!
//! let new_year = Timestamp::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
//! assert_eq!(new_year.to_string(), "2024-01-01T00:00:00+00:00");
//! assert!(Timestamp::now() > new_year);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.0 >= before);
        assert!(ts.0 <= after);
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let ts = Timestamp::from(Utc.timestamp_opt(1_704_067_200, 0).unwrap());
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-01T00:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn display_is_rfc3339() {
        let ts = Timestamp::from(Utc.timestamp_opt(0, 0).unwrap());
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00+00:00");
    }
}
