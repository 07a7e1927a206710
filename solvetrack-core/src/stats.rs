//! Fetched cumulative counts for a single user.
use serde::{Deserialize, Serialize};

/// Cumulative solved counts as reported by the remote platform.
///
/// Field names mirror the remote JSON payload; any field the payload omits
/// decodes as zero, matching how the platform treats unreported difficulties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolvedStats {
    pub total_solved: i64,
    pub easy_solved: i64,
    pub medium_solved: i64,
    pub hard_solved: i64,
}

impl SolvedStats {
    /// Stats with only a total, all per-difficulty counts zero.
    #[must_use]
    pub const fn with_total(total: i64) -> Self {
        Self {
            total_solved: total,
            easy_solved: 0,
            medium_solved: 0,
            hard_solved: 0,
        }
    }
}
