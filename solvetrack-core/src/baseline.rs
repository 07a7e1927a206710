//! Durable per-user baselines and the typed store adapter over the
//! key-value collaborator.
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::KeyValueStore;
use crate::period::PeriodTags;
use crate::stats::SolvedStats;

/// Key prefix for per-user baseline records.
const USER_KEY_PREFIX: &str = "solvetrack.user.";
/// Reserved key holding the locally added username list.
const CUSTOM_USERNAMES_KEY: &str = "solvetrack.custom.usernames";
/// Reserved key holding the locally added display-name overrides.
const CUSTOM_MAPPINGS_KEY: &str = "solvetrack.custom.mappings";

/// Rolling baseline persisted for one tracked username.
///
/// Replaced wholesale by each successful reconciliation and left untouched
/// by failed ones. Serialized field names match the JSON shape earlier
/// trackers persisted, so existing stores stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineRecord {
    /// Cumulative total captured at the start of the tracked day.
    pub start_of_day_total: i64,
    /// Cumulative total captured at the start of the tracked month.
    pub start_of_month_total: i64,
    /// Last-known cumulative total.
    pub total: i64,
    /// Last computed daily delta, cached for offline fallback.
    pub daily_increase: i64,
    /// Last computed monthly delta, cached for offline fallback.
    pub monthly_increase: i64,
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
    /// Tracked day tag, `YYYY-MM-DD`.
    pub last_updated_day: String,
    /// Tracked month tag, `YYYY-MM`.
    pub last_updated_month: String,
}

impl BaselineRecord {
    /// Seed a baseline for a user seen for the first time: both period
    /// baselines equal the fetched total, so both deltas start at zero.
    #[must_use]
    pub fn seeded(stats: &SolvedStats, tags: &PeriodTags) -> Self {
        Self {
            start_of_day_total: stats.total_solved,
            start_of_month_total: stats.total_solved,
            total: stats.total_solved,
            daily_increase: 0,
            monthly_increase: 0,
            easy: stats.easy_solved,
            medium: stats.medium_solved,
            hard: stats.hard_solved,
            last_updated_day: tags.day.clone(),
            last_updated_month: tags.month.clone(),
        }
    }
}

/// Compute the replacement baseline for one successful reconciliation.
///
/// A user without a stored record is seeded first, which makes the
/// same-period math below yield zero deltas naturally. On a day or month
/// rollover the delta for that period resets to zero and its start total
/// jumps to the fetched value; otherwise the delta is the fetched total
/// minus the period's start total. Negative deltas are preserved: the
/// platform deciding to shrink a total is reported, not clamped.
#[must_use]
pub fn advance_baseline(
    stored: Option<&BaselineRecord>,
    fetched: &SolvedStats,
    tags: &PeriodTags,
) -> BaselineRecord {
    let stored = match stored {
        Some(record) => record.clone(),
        None => BaselineRecord::seeded(fetched, tags),
    };

    let is_new_day = stored.last_updated_day != tags.day;
    let is_new_month = stored.last_updated_month != tags.month;

    let daily_increase = if is_new_day {
        0
    } else {
        fetched.total_solved.saturating_sub(stored.start_of_day_total)
    };
    let monthly_increase = if is_new_month {
        0
    } else {
        fetched.total_solved.saturating_sub(stored.start_of_month_total)
    };

    BaselineRecord {
        start_of_day_total: if is_new_day {
            fetched.total_solved
        } else {
            stored.start_of_day_total
        },
        start_of_month_total: if is_new_month {
            fetched.total_solved
        } else {
            stored.start_of_month_total
        },
        total: fetched.total_solved,
        daily_increase,
        monthly_increase,
        easy: fetched.easy_solved,
        medium: fetched.medium_solved,
        hard: fetched.hard_solved,
        last_updated_day: tags.day.clone(),
        last_updated_month: tags.month.clone(),
    }
}

/// Errors from the typed baseline store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Typed read/write of baseline records and the two reserved custom-roster
/// keys, over the opaque key-value collaborator.
///
/// Reads never fail: a backend error or a stored value that no longer
/// parses is treated as absent data, so the worst outcome is reseeding a
/// user on their next successful fetch.
#[derive(Debug)]
pub struct BaselineStore<S> {
    store: S,
}

impl<S: KeyValueStore> BaselineStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    fn user_key(username: &str) -> String {
        format!("{USER_KEY_PREFIX}{username}")
    }

    /// Load the baseline for a username, or `None` when nothing usable is
    /// stored.
    pub fn load(&self, username: &str) -> Option<BaselineRecord> {
        let value = match self.store.get(&Self::user_key(username)) {
            Ok(value) => value?,
            Err(err) => {
                log::warn!("baseline read failed for {username}: {err}");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("stored baseline for {username} is unreadable, treating as absent: {err}");
                None
            }
        }
    }

    /// Replace the stored baseline for a username wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or the backend
    /// rejects the write.
    pub fn save(&self, username: &str, record: &BaselineRecord) -> Result<(), StoreError> {
        self.save_value(&Self::user_key(username), record)
    }

    /// Locally added usernames, in insertion order. Absent or unreadable
    /// state loads as empty.
    #[must_use]
    pub fn load_custom_usernames(&self) -> Vec<String> {
        self.load_or_default(CUSTOM_USERNAMES_KEY)
    }

    /// Locally added display-name overrides. Absent or unreadable state
    /// loads as empty.
    #[must_use]
    pub fn load_custom_mappings(&self) -> HashMap<String, String> {
        self.load_or_default(CUSTOM_MAPPINGS_KEY)
    }

    /// Persist the custom username list.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub fn save_custom_usernames(&self, usernames: &[String]) -> Result<(), StoreError> {
        self.save_value(CUSTOM_USERNAMES_KEY, &usernames)
    }

    /// Persist the custom display-name overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub fn save_custom_mappings(&self, mappings: &HashMap<String, String>) -> Result<(), StoreError> {
        self.save_value(CUSTOM_MAPPINGS_KEY, mappings)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log::warn!("stored value under {key} is unreadable, using defaults: {err}");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(err) => {
                log::warn!("read failed for {key}: {err}");
                T::default()
            }
        }
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.store
            .set(key, &value)
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}
