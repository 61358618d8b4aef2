//! Snapshot collection service configuration.

use serde::{Deserialize, Serialize};

fn default_collection() -> String {
    String::from("performance_snapshots")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Base URL of the collection service. Usually the platform's base URL.
    #[serde(default)]
    pub base_url: String,

    /// Logical collection holding stored snapshots.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Bearer token. Falls back to `platform.api_token` when empty.
    #[serde(default)]
    pub api_token: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            collection: default_collection(),
            api_token: String::new(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.collection.is_empty()
    }
}
