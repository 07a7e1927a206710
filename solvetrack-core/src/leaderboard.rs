//! Presentation-ready leaderboard rows and the ranking pass.
use serde::{Deserialize, Serialize};

use crate::baseline::BaselineRecord;

/// One ranked row of the leaderboard, ready for rendering or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position after ranking. Zero until [`rank_entries`] runs.
    pub rank: u32,
    pub username: String,
    /// Resolved display name, falling back to the username itself.
    pub display_name: String,
    pub total: i64,
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
    pub daily_increase: i64,
    pub monthly_increase: i64,
}

impl LeaderboardEntry {
    /// Build an unranked row from a reconciled baseline.
    #[must_use]
    pub fn from_record(username: &str, display_name: &str, record: &BaselineRecord) -> Self {
        Self {
            rank: 0,
            username: username.to_string(),
            display_name: display_name.to_string(),
            total: record.total,
            easy: record.easy,
            medium: record.medium,
            hard: record.hard,
            daily_increase: record.daily_increase,
            monthly_increase: record.monthly_increase,
        }
    }

    /// Build an all-zero row for a user with no usable figures this cycle.
    #[must_use]
    pub fn zeroed(username: &str, display_name: &str) -> Self {
        Self {
            rank: 0,
            username: username.to_string(),
            display_name: display_name.to_string(),
            total: 0,
            easy: 0,
            medium: 0,
            hard: 0,
            daily_increase: 0,
            monthly_increase: 0,
        }
    }
}

/// Sort entries by total solved, highest first, and assign contiguous
/// 1-based ranks. The sort is stable, so users tied on total keep their
/// roster order and still receive distinct consecutive ranks.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
    }
}
