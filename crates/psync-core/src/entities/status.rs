use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A player's state as held by the gamification platform. Read-only input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PlatformStatus {
    #[serde(default)]
    pub total_points: f64,
    /// Catalog item id → owned count. Used as boolean lock/boost flags.
    #[serde(default)]
    pub catalog_items: BTreeMap<String, u64>,
    #[serde(default)]
    pub challenge_progress: Vec<ChallengeProgress>,
}

/// The platform's native progress record for one challenge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChallengeProgress {
    pub challenge: String,
    pub percent_completed: f64,
}

impl PlatformStatus {
    /// Count of a catalog item, `0` when the player does not own it.
    #[must_use]
    pub fn item_count(&self, item_id: &str) -> u64 {
        self.catalog_items.get(item_id).copied().unwrap_or(0)
    }

    /// Progress for a challenge, if the platform reports one.
    #[must_use]
    pub fn challenge_percent(&self, challenge_id: &str) -> Option<f64> {
        self.challenge_progress
            .iter()
            .find(|entry| entry.challenge == challenge_id)
            .map(|entry| entry.percent_completed)
    }
}
