//! Remote collection service client.

use std::time::Duration;

use serde_json::Value;

use crate::http::check_response;
use crate::pipeline::{Stage, pipeline_json};
use crate::{SnapshotStore, StoreError};

/// HTTP client for one collection of the platform's database API.
///
/// - aggregate: `POST {base}/v3/database/{collection}/aggregate?strict=true`
/// - insert: `PUT {base}/v3/database/{collection}`
pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    token: String,
}

impl std::fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStore")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpStore {
    /// Build a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(
        base_url: &str,
        collection: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .user_agent("pointsync/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            token: token.to_string(),
        })
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!(
            "{}/v3/database/{}{suffix}",
            self.base_url,
            urlencoding::encode(&self.collection)
        )
    }
}

impl SnapshotStore for HttpStore {
    async fn aggregate(&self, stages: &[Stage]) -> Result<Vec<Value>, StoreError> {
        let url = self.collection_url("/aggregate?strict=true");
        tracing::debug!(%url, stages = stages.len(), "store aggregate");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&pipeline_json(stages))
            .send()
            .await?;
        let body: Value = check_response::<StoreError>(resp).await?.json().await?;
        match body {
            Value::Array(documents) => Ok(documents),
            other => Err(StoreError::Parse(format!(
                "aggregate response is not an array: {other}"
            ))),
        }
    }

    async fn insert(&self, document: Value) -> Result<(), StoreError> {
        let url = self.collection_url("");
        tracing::debug!(%url, "store insert");
        let resp = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .json(&document)
            .send()
            .await?;
        check_response::<StoreError>(resp).await?;
        Ok(())
    }
}
