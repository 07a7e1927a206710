//! The per-cycle reconciliation fan-out: fetch, advance, rank.
use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::baseline::{BaselineStore, advance_baseline};
use crate::directory::Directory;
use crate::leaderboard::{LeaderboardEntry, rank_entries};
use crate::period::PeriodTags;
use crate::{KeyValueStore, StatsSource};

/// Where one user's figures came from this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    /// The fetch succeeded and the baseline was advanced.
    Fetched,
    /// The fetch failed; the figures are a baseline from an earlier cycle.
    Cached,
    /// The fetch failed and no baseline existed; the figures are all zero.
    Zeroed,
}

/// Per-user outcome for one cycle, in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOutcome {
    pub username: String,
    pub source: EntrySource,
}

/// One completed reconciliation cycle: the ranked board plus per-user
/// outcomes so callers can mark stale rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Ranked rows, highest total first.
    pub entries: Vec<LeaderboardEntry>,
    /// Outcomes in roster order, one per reconciled username.
    pub outcomes: Vec<UserOutcome>,
}

impl CycleReport {
    /// Usernames that did not get fresh figures this cycle.
    #[must_use]
    pub fn degraded(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.source != EntrySource::Fetched)
            .map(|outcome| outcome.username.as_str())
            .collect()
    }

    /// Whether any row for this username is showing stale or empty figures.
    #[must_use]
    pub fn is_stale(&self, username: &str) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.username == username && outcome.source != EntrySource::Fetched)
    }
}

/// Run one reconciliation cycle over every user in the directory.
///
/// Period tags are derived once from `now` and shared by every task, so a
/// cycle straddling midnight stays internally consistent. The fan-out is
/// one future per username joined on a single logical task; a task never
/// escapes the barrier, so per-user failures degrade that user's row and
/// nothing else. The returned board is sorted by total, stable on roster
/// order, with contiguous 1-based ranks.
pub(crate) async fn run_cycle<C, S>(
    client: &C,
    baselines: &BaselineStore<S>,
    directory: &Directory,
    now: DateTime<Utc>,
) -> CycleReport
where
    C: StatsSource,
    S: KeyValueStore,
{
    let tags = PeriodTags::from_instant(now);
    let tasks = directory
        .usernames()
        .iter()
        .map(|username| reconcile_user(client, baselines, directory, username, &tags));
    let results = join_all(tasks).await;

    let mut entries = Vec::with_capacity(results.len());
    let mut outcomes = Vec::with_capacity(results.len());
    for (entry, outcome) in results {
        entries.push(entry);
        outcomes.push(outcome);
    }
    rank_entries(&mut entries);

    let fresh = outcomes
        .iter()
        .filter(|outcome| outcome.source == EntrySource::Fetched)
        .count();
    log::debug!("cycle complete: {fresh}/{} users fresh", outcomes.len());
    CycleReport { entries, outcomes }
}

/// Reconcile one username. Infallible by construction: a fetch failure
/// falls back to the cached baseline, or to an all-zero row when none
/// exists, and leaves the stored baseline untouched.
async fn reconcile_user<C, S>(
    client: &C,
    baselines: &BaselineStore<S>,
    directory: &Directory,
    username: &str,
    tags: &PeriodTags,
) -> (LeaderboardEntry, UserOutcome)
where
    C: StatsSource,
    S: KeyValueStore,
{
    let display = directory.display_name(username);
    let outcome = |source| UserOutcome {
        username: username.to_string(),
        source,
    };
    match client.fetch_stats(username).await {
        Ok(stats) => {
            let stored = baselines.load(username);
            let next = advance_baseline(stored.as_ref(), &stats, tags);
            if let Err(err) = baselines.save(username, &next) {
                log::warn!("baseline write failed for {username}, figures held in memory this cycle: {err}");
            }
            (
                LeaderboardEntry::from_record(username, display, &next),
                outcome(EntrySource::Fetched),
            )
        }
        Err(err) => {
            log::warn!("stats fetch failed for {username}: {err}");
            match baselines.load(username) {
                Some(cached) => (
                    LeaderboardEntry::from_record(username, display, &cached),
                    outcome(EntrySource::Cached),
                ),
                None => (
                    LeaderboardEntry::zeroed(username, display),
                    outcome(EntrySource::Zeroed),
                ),
            }
        }
    }
}
