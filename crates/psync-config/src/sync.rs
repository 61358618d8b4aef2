//! Comparison and submission tuning.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_tolerance() -> f64 {
    0.01
}

const fn default_lookup_concurrency() -> usize {
    8
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_retry_base_delay_ms() -> u64 {
    1000
}

const fn default_inter_request_delay_ms() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Minimum absolute percentage-point change that counts as a difference.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Parallel snapshot lookups per batch.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    /// Attempts per individual submission, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit; attempt `n` waits `n × base` before the next attempt.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Pause between individual submissions in fallback mode.
    #[serde(default = "default_inter_request_delay_ms")]
    pub inter_request_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            lookup_concurrency: default_lookup_concurrency(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            inter_request_delay_ms: default_inter_request_delay_ms(),
        }
    }
}

impl SyncConfig {
    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(invalid("sync.tolerance", "must be a positive number"));
        }
        if self.lookup_concurrency == 0 {
            return Err(invalid("sync.lookup_concurrency", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("sync.max_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
