//! Roster acquisition and the local overlay of user-added entries.
use std::collections::HashMap;

use thiserror::Error;

use crate::baseline::{BaselineStore, StoreError};
use crate::{KeyValueStore, StatsSource};

/// Roster payload fetched from the remote directory host: the ordered
/// username list plus the display-name map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRoster {
    pub usernames: Vec<String>,
    pub mappings: HashMap<String, String>,
}

/// One merged roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub username: String,
    pub display_name: String,
}

/// Merged working set for one session: the remote roster plus the locally
/// added overlay. Held by the caller and treated as read-only while a
/// reconciliation cycle runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    usernames: Vec<String>,
    mappings: HashMap<String, String>,
}

impl Directory {
    /// Merge a remote roster with the local overlay. Username lists
    /// concatenate, remote first, without de-duplication; locally set
    /// display names override remote ones.
    #[must_use]
    pub fn merged(
        remote: RemoteRoster,
        custom_usernames: Vec<String>,
        custom_mappings: HashMap<String, String>,
    ) -> Self {
        let mut usernames = remote.usernames;
        usernames.extend(custom_usernames);
        let mut mappings = remote.mappings;
        mappings.extend(custom_mappings);
        Self { usernames, mappings }
    }

    /// Usernames in roster order, duplicates included.
    #[must_use]
    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    /// Resolve the display name for a username. An absent or empty mapping
    /// falls back to the username itself.
    #[must_use]
    pub fn display_name<'a>(&'a self, username: &'a str) -> &'a str {
        match self.mappings.get(username) {
            Some(name) if !name.is_empty() => name.as_str(),
            _ => username,
        }
    }

    /// Exact, case-sensitive membership test.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.usernames.iter().any(|tracked| tracked == username)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }

    /// Merged roster rows with resolved display names, in roster order.
    #[must_use]
    pub fn entries(&self) -> Vec<DirectoryEntry> {
        self.usernames
            .iter()
            .map(|username| DirectoryEntry {
                username: username.clone(),
                display_name: self.display_name(username).to_string(),
            })
            .collect()
    }

    fn push(&mut self, username: String, display_name: String) {
        self.mappings.insert(username.clone(), display_name);
        self.usernames.push(username);
    }
}

/// Result of a directory load. `warning` is set when the remote roster was
/// unreachable and the session is running on the local overlay alone.
#[derive(Debug)]
pub struct DirectoryLoad {
    pub directory: Directory,
    pub warning: Option<String>,
}

/// Rejections from the add-user flow. Validation failures leave both the
/// store and the in-memory directory untouched.
#[derive(Debug, Error)]
pub enum AddUserError {
    #[error("user '{0}' is already on the board")]
    AlreadyExists(String),
    #[error("user '{username}' could not be verified: {reason}")]
    NotFound { username: String, reason: String },
    #[error("user '{username}' verified but could not be saved")]
    Store {
        username: String,
        #[source]
        source: StoreError,
    },
}

/// Fetch the remote roster and merge it with the locally added overlay.
/// A roster fetch failure is non-fatal: the load degrades to the overlay
/// alone and carries a warning for the caller to surface.
pub(crate) async fn load_directory<C, S>(client: &C, baselines: &BaselineStore<S>) -> DirectoryLoad
where
    C: StatsSource,
    S: KeyValueStore,
{
    let custom_usernames = baselines.load_custom_usernames();
    let custom_mappings = baselines.load_custom_mappings();
    match client.fetch_roster().await {
        Ok(roster) => DirectoryLoad {
            directory: Directory::merged(roster, custom_usernames, custom_mappings),
            warning: None,
        },
        Err(err) => {
            log::warn!("roster fetch failed, continuing with locally added users only: {err}");
            DirectoryLoad {
                directory: Directory::merged(
                    RemoteRoster::default(),
                    custom_usernames,
                    custom_mappings,
                ),
                warning: Some(format!(
                    "directory service unreachable ({err}); showing locally added users only"
                )),
            }
        }
    }
}

/// Add a user to the local overlay after verifying the username exists on
/// the platform with one stats probe. On success the custom list and the
/// display-name override are persisted and the in-memory directory is
/// updated immediately, so the next cycle already includes the user.
pub(crate) async fn add_user<C, S>(
    client: &C,
    baselines: &BaselineStore<S>,
    directory: &mut Directory,
    username: &str,
    display_name: Option<&str>,
) -> Result<(), AddUserError>
where
    C: StatsSource,
    S: KeyValueStore,
{
    if directory.contains(username) {
        return Err(AddUserError::AlreadyExists(username.to_string()));
    }
    if let Err(err) = client.fetch_stats(username).await {
        return Err(AddUserError::NotFound {
            username: username.to_string(),
            reason: err.to_string(),
        });
    }
    let display = display_name
        .filter(|name| !name.is_empty())
        .unwrap_or(username);

    let mut custom_usernames = baselines.load_custom_usernames();
    custom_usernames.push(username.to_string());
    baselines
        .save_custom_usernames(&custom_usernames)
        .map_err(|source| AddUserError::Store {
            username: username.to_string(),
            source,
        })?;

    let mut custom_mappings = baselines.load_custom_mappings();
    custom_mappings.insert(username.to_string(), display.to_string());
    baselines
        .save_custom_mappings(&custom_mappings)
        .map_err(|source| AddUserError::Store {
            username: username.to_string(),
            source,
        })?;

    directory.push(username.to_string(), display.to_string());
    Ok(())
}
