use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Metric;

/// A point-adjustment instruction for the gamification platform.
///
/// `delta` is an adjustment, not an absolute value. Inert once generated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ActionLog {
    pub player_id: String,
    pub action_id: String,
    pub delta: f64,
    pub timestamp: DateTime<Utc>,
    pub audit: ActionAudit,
}

/// Audit metadata carried alongside an action log. Never sent to the platform.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ActionAudit {
    pub metric: Metric,
    pub previous_value: f64,
    pub new_value: f64,
    pub percent_change: f64,
}

/// Wire shape of an action log, shared by the bulk and single-item endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub action_id: String,
    pub user_id: String,
    pub attributes: ActionAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionAttributes {
    pub value: f64,
}

impl From<&ActionLog> for ActionLogEntry {
    fn from(log: &ActionLog) -> Self {
        Self {
            action_id: log.action_id.clone(),
            user_id: log.player_id.clone(),
            attributes: ActionAttributes { value: log.delta },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_entry_carries_only_the_delta() {
        let log = ActionLog {
            player_id: "P1".into(),
            action_id: "atividade".into(),
            delta: 85.5,
            timestamp: Utc::now(),
            audit: ActionAudit {
                metric: Metric::Atividade,
                previous_value: 0.0,
                new_value: 85.5,
                percent_change: 100.0,
            },
        };
        let value = serde_json::to_value(ActionLogEntry::from(&log)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "actionId": "atividade",
                "userId": "P1",
                "attributes": {"value": 85.5}
            })
        );
    }
}
