//! HTTP adapter for the stats backend and the shared roster files.
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use solvetrack_core::{RemoteRoster, SolvedStats, StatsSource};
use thiserror::Error;

/// Errors from the HTTP stats source.
#[derive(Debug, Error)]
pub enum HttpSourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// Stats source backed by two HTTP hosts: the per-user stats backend and
/// the static host serving the shared roster files.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    client: Client,
    api_base: String,
    roster_base: String,
}

impl HttpStatsSource {
    /// Build a source with a client-level timeout. Trailing slashes on the
    /// base URLs are tolerated.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        api_base: &str,
        roster_base: &str,
        timeout: Duration,
    ) -> Result<Self, HttpSourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            roster_base: roster_base.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn stats_url(&self, username: &str) -> String {
        format!("{}/user/{username}", self.api_base)
    }

    pub(crate) fn usernames_url(&self) -> String {
        format!("{}/usernames.json", self.roster_base)
    }

    pub(crate) fn mappings_url(&self) -> String {
        format!("{}/usernameMappings.json", self.roster_base)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, HttpSourceError> {
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpSourceError::Status { status, url });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    type Error = HttpSourceError;

    async fn fetch_stats(&self, username: &str) -> Result<SolvedStats, Self::Error> {
        self.get_json(self.stats_url(username)).await
    }

    async fn fetch_roster(&self) -> Result<RemoteRoster, Self::Error> {
        let usernames: Vec<String> = self.get_json(self.usernames_url()).await?;
        let mappings: HashMap<String, String> = self.get_json(self.mappings_url()).await?;
        Ok(RemoteRoster {
            usernames,
            mappings,
        })
    }
}
