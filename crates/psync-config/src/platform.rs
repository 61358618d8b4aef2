//! Gamification platform endpoint configuration.

use serde::{Deserialize, Serialize};

const fn default_bulk_timeout_secs() -> u64 {
    120
}

const fn default_request_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API (e.g. `https://service2.funifier.com`).
    #[serde(default)]
    pub base_url: String,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub api_token: String,

    /// Timeout for the bulk action-log call, sized for a whole batch.
    #[serde(default = "default_bulk_timeout_secs")]
    pub bulk_timeout_secs: u64,

    /// Timeout for single-item calls and status reads.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            bulk_timeout_secs: default_bulk_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl PlatformConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_token.is_empty()
    }
}
