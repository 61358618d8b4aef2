//! Metric → action identifier table.

use std::collections::BTreeMap;

use psync_core::enums::Metric;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Per-deployment overrides of the action identifiers used for each metric.
///
/// Keys are metric wire names. Metrics without an override map to their own
/// wire name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActionsConfig {
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl ActionsConfig {
    /// Resolve the full table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an override keyed by an unknown
    /// metric or mapping to an empty identifier.
    pub fn action_table(&self) -> Result<BTreeMap<Metric, String>, ConfigError> {
        let mut table: BTreeMap<Metric, String> = Metric::ALL
            .into_iter()
            .map(|metric| (metric, metric.as_str().to_string()))
            .collect();

        for (name, action_id) in &self.overrides {
            let metric = Metric::from_wire(name).ok_or_else(|| ConfigError::InvalidValue {
                field: format!("actions.overrides.{name}"),
                reason: String::from("unknown metric"),
            })?;
            if action_id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("actions.overrides.{name}"),
                    reason: String::from("action identifier must not be empty"),
                });
            }
            table.insert(metric, action_id.clone());
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_uses_wire_names() {
        let table = ActionsConfig::default().action_table().unwrap();
        assert_eq!(table.len(), Metric::ALL.len());
        assert_eq!(table[&Metric::Atividade], "atividade");
        assert_eq!(table[&Metric::ReaisPorAtivo], "reaisPorAtivo");
    }

    #[test]
    fn override_replaces_one_entry() {
        let config = ActionsConfig {
            overrides: BTreeMap::from([("upa".to_string(), "upa_v2".to_string())]),
        };
        let table = config.action_table().unwrap();
        assert_eq!(table[&Metric::Upa], "upa_v2");
        assert_eq!(table[&Metric::Conversoes], "conversoes");
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let config = ActionsConfig {
            overrides: BTreeMap::from([("pontos".to_string(), "x".to_string())]),
        };
        let err = config.action_table().unwrap_err();
        assert!(err.to_string().contains("actions.overrides.pontos"));
    }
}
