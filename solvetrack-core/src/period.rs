//! Tracked-period tags driving day and month rollover detection.
use chrono::{DateTime, Utc};

/// Day and month tags derived once from a single reference instant and
/// shared by every task in a refresh cycle.
///
/// Rollover detection is plain string equality on these tags, not calendar
/// arithmetic: that is the rule the persisted records were written under,
/// and deriving both tags from one instant keeps them mutually consistent
/// even when a cycle spans midnight mid-flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodTags {
    /// Tracked day tag, `YYYY-MM-DD`.
    pub day: String,
    /// Tracked month tag, `YYYY-MM`.
    pub month: String,
}

impl PeriodTags {
    /// Derive both tags from one UTC instant.
    #[must_use]
    pub fn from_instant(now: DateTime<Utc>) -> Self {
        Self {
            day: now.format("%Y-%m-%d").to_string(),
            month: now.format("%Y-%m").to_string(),
        }
    }
}
