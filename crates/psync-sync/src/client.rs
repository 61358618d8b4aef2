//! HTTP client for the gamification platform.

use std::time::Duration;

use psync_config::PlatformConfig;
use psync_core::entities::{ActionLogEntry, PlatformStatus};
use psync_store::http::check_response;
use serde::Deserialize;

use crate::transport::{Credentials, PlatformTransport};
use crate::PlatformError;

/// Body of a successful bulk submission.
#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(alias = "total_registered")]
    registered: usize,
}

/// Platform API client.
///
/// - bulk: `POST {base}/v3/action/log/bulk`
/// - single: `POST {base}/v3/action/log`
/// - player status: `GET {base}/v3/player/{id}/status`
///
/// The bulk call gets a timeout sized for a whole batch, every other call the
/// short per-request timeout.
#[derive(Debug)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    bulk_timeout: Duration,
    request_timeout: Duration,
}

impl PlatformClient {
    /// # Errors
    ///
    /// Returns [`PlatformError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .user_agent("pointsync/0.1")
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bulk_timeout: Duration::from_secs(config.bulk_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    /// Current points, catalog items, and challenge progress of a player.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request fails, the platform rejects
    /// it, or the body is not a player status.
    pub async fn fetch_player_status(
        &self,
        player_id: &str,
        credentials: &Credentials,
    ) -> Result<PlatformStatus, PlatformError> {
        let url = format!(
            "{}/v3/player/{}/status",
            self.base_url,
            urlencoding::encode(player_id)
        );
        tracing::debug!(%url, "fetching player status");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(credentials.token())
            .timeout(self.request_timeout)
            .send()
            .await?;
        check_response::<PlatformError>(resp)
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))
    }
}

impl PlatformTransport for PlatformClient {
    async fn submit_bulk(
        &self,
        entries: &[ActionLogEntry],
        credentials: &Credentials,
    ) -> Result<usize, PlatformError> {
        let url = format!("{}/v3/action/log/bulk", self.base_url);
        tracing::debug!(%url, entries = entries.len(), "bulk action log submission");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(credentials.token())
            .timeout(self.bulk_timeout)
            .json(entries)
            .send()
            .await?;
        let body: BulkResponse = check_response::<PlatformError>(resp)
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))?;
        Ok(body.registered)
    }

    async fn submit_one(
        &self,
        entry: &ActionLogEntry,
        credentials: &Credentials,
    ) -> Result<(), PlatformError> {
        let url = format!("{}/v3/action/log", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(credentials.token())
            .timeout(self.request_timeout)
            .json(entry)
            .send()
            .await?;
        check_response::<PlatformError>(resp).await?;
        Ok(())
    }
}
