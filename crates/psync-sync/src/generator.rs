//! Turns comparison results into point-adjustment action logs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use psync_config::{ActionsConfig, ConfigError};
use psync_core::entities::{ActionAudit, ActionLog, ComparisonResult};
use psync_core::enums::Metric;

/// Maps qualifying differences to action logs through a metric → action
/// identifier table.
#[derive(Debug, Clone)]
pub struct ActionLogGenerator {
    action_table: BTreeMap<Metric, String>,
}

impl ActionLogGenerator {
    #[must_use]
    pub const fn new(action_table: BTreeMap<Metric, String>) -> Self {
        Self { action_table }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if an override is invalid.
    pub fn from_config(config: &ActionsConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.action_table()?))
    }

    #[must_use]
    pub fn action_id(&self, metric: Metric) -> Option<&str> {
        self.action_table.get(&metric).map(String::as_str)
    }

    /// Action logs for every difference that requires an update, stamped now.
    #[must_use]
    pub fn generate(&self, results: &[ComparisonResult]) -> Vec<ActionLog> {
        self.generate_at(results, Utc::now())
    }

    /// Same as [`Self::generate`] with an explicit timestamp.
    #[must_use]
    pub fn generate_at(&self, results: &[ComparisonResult], timestamp: DateTime<Utc>) -> Vec<ActionLog> {
        let logs: Vec<ActionLog> = results
            .iter()
            .filter(|result| result.has_changes)
            .flat_map(|result| &result.differences)
            .filter(|diff| diff.requires_update)
            .filter_map(|diff| {
                let Some(action_id) = self.action_id(diff.metric) else {
                    tracing::warn!(
                        player_id = %diff.player_id,
                        metric = %diff.metric,
                        "no action identifier for metric, skipping"
                    );
                    return None;
                };
                Some(ActionLog {
                    player_id: diff.player_id.clone(),
                    action_id: action_id.to_string(),
                    delta: diff.delta,
                    timestamp,
                    audit: ActionAudit {
                        metric: diff.metric,
                        previous_value: diff.old_value,
                        new_value: diff.new_value,
                        percent_change: diff.percent_change,
                    },
                })
            })
            .collect();
        tracing::debug!(action_logs = logs.len(), "generated action logs");
        logs
    }
}
