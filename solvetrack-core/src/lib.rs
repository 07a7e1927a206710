//! Solvetrack Core
//!
//! Platform-agnostic reconciliation engine for the solvetrack leaderboard.
//! This crate turns fetched cumulative solved counts into ranked daily and
//! monthly progress with rollover detection, without UI or I/O dependencies.

pub mod baseline;
pub mod directory;
pub mod leaderboard;
pub mod period;
pub mod reconcile;
pub mod stats;

#[cfg(test)]
pub(crate) mod testkit;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

// Re-export commonly used types
pub use baseline::{BaselineRecord, BaselineStore, StoreError, advance_baseline};
pub use directory::{AddUserError, Directory, DirectoryEntry, DirectoryLoad, RemoteRoster};
pub use leaderboard::{LeaderboardEntry, rank_entries};
pub use period::PeriodTags;
pub use reconcile::{CycleReport, EntrySource, UserOutcome};
pub use stats::SolvedStats;

/// Trait for abstracting stats and roster fetching
/// Platform-specific implementations should provide this
#[async_trait]
pub trait StatsSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the cumulative solved counts for one username
    ///
    /// # Errors
    ///
    /// Returns an error if the user's stats cannot be fetched.
    async fn fetch_stats(&self, username: &str) -> Result<SolvedStats, Self::Error>;

    /// Fetch the shared roster of tracked usernames and display names
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be fetched.
    async fn fetch_roster(&self) -> Result<RemoteRoster, Self::Error>;
}

/// Trait for abstracting durable key-value persistence
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under a key
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, Self::Error>;

    /// Store a value under a key, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), Self::Error>;
}

/// Main tracker facade for running leaderboard sessions
pub struct Tracker<C, S>
where
    C: StatsSource,
    S: KeyValueStore,
{
    client: C,
    baselines: BaselineStore<S>,
}

impl<C, S> Tracker<C, S>
where
    C: StatsSource,
    S: KeyValueStore,
{
    /// Create a new tracker with the provided stats source and store
    pub const fn new(client: C, store: S) -> Self {
        Self {
            client,
            baselines: BaselineStore::new(store),
        }
    }

    /// Load the merged directory of tracked users.
    ///
    /// Never fails: a roster fetch failure degrades the load to locally
    /// added users and sets its warning.
    pub async fn load_directory(&self) -> DirectoryLoad {
        directory::load_directory(&self.client, &self.baselines).await
    }

    /// Verify a username against the platform and add it to the local
    /// overlay, persisting the overlay and updating `directory` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is already tracked, cannot be
    /// verified, or the overlay cannot be persisted.
    pub async fn add_user(
        &self,
        directory: &mut Directory,
        username: &str,
        display_name: Option<&str>,
    ) -> Result<(), AddUserError> {
        directory::add_user(&self.client, &self.baselines, directory, username, display_name).await
    }

    /// Run one reconciliation cycle at the given reference instant and
    /// return the ranked board with per-user outcomes.
    pub async fn run_cycle(&self, directory: &Directory, now: DateTime<Utc>) -> CycleReport {
        reconcile::run_cycle(&self.client, &self.baselines, directory, now).await
    }
}
