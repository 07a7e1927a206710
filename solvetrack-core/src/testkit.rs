//! In-memory scripted collaborators shared by the unit tests.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::directory::RemoteRoster;
use crate::stats::SolvedStats;
use crate::{KeyValueStore, StatsSource};

#[derive(Debug, Error)]
#[error("injected store failure")]
pub(crate) struct StoreFailure;

#[derive(Default)]
struct MemoryInner {
    cells: HashMap<String, Value>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// Shared in-memory key-value store. Clones share the same cells, so a
/// test can keep a handle for inspection while the store under test owns
/// another.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    /// Seed a raw value, bypassing the trait.
    pub(crate) fn insert(&self, key: &str, value: Value) {
        self.inner
            .lock()
            .unwrap()
            .cells
            .insert(key.to_string(), value);
    }

    /// Read a raw value, bypassing the trait and any injected failures.
    pub(crate) fn snapshot(&self, key: &str) -> Option<Value> {
        self.inner.lock().unwrap().cells.get(key).cloned()
    }

    /// Number of committed writes.
    pub(crate) fn write_count(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    pub(crate) fn set_fail_reads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_reads = fail;
    }

    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    type Error = StoreFailure;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_reads {
            return Err(StoreFailure);
        }
        Ok(inner.cells.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(StoreFailure);
        }
        inner.writes += 1;
        inner.cells.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub(crate) enum ScriptedError {
    #[error("no scripted stats for '{0}'")]
    NoStats(String),
    #[error("no scripted roster")]
    NoRoster,
}

/// Scripted stats source: responds with pre-registered payloads and fails
/// for everything else. Records every stats fetch it receives.
#[derive(Clone, Default)]
pub(crate) struct ScriptedClient {
    stats: HashMap<String, SolvedStats>,
    roster: Option<RemoteRoster>,
    log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_stats(mut self, username: &str, stats: SolvedStats) -> Self {
        self.stats.insert(username.to_string(), stats);
        self
    }

    pub(crate) fn with_roster(mut self, roster: RemoteRoster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Usernames fetched so far, in call order.
    pub(crate) fn fetch_log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsSource for ScriptedClient {
    type Error = ScriptedError;

    async fn fetch_stats(&self, username: &str) -> Result<SolvedStats, Self::Error> {
        self.log.lock().unwrap().push(username.to_string());
        self.stats
            .get(username)
            .copied()
            .ok_or_else(|| ScriptedError::NoStats(username.to_string()))
    }

    async fn fetch_roster(&self) -> Result<RemoteRoster, Self::Error> {
        self.roster.clone().ok_or(ScriptedError::NoRoster)
    }
}
