use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Metric, TeamVariant};

/// A per-metric change between the stored baseline and a new report.
///
/// Computed by the comparator, consumed once by the action log generator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetricDifference {
    pub player_id: String,
    pub metric: Metric,
    pub old_value: f64,
    pub new_value: f64,
    pub delta: f64,
    pub percent_change: f64,
    pub requires_update: bool,
}

/// Outcome of comparing one player's report against their baseline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ComparisonResult {
    pub player_id: String,
    pub team: TeamVariant,
    pub differences: Vec<MetricDifference>,
    pub has_changes: bool,
    /// Whether a stored baseline was found (always `false` for a new cycle).
    pub had_baseline: bool,
    pub summary: String,
}

/// Comparator output for a whole upload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ComparisonReport {
    pub cycle_number: u32,
    pub is_new_cycle: bool,
    pub results: Vec<ComparisonResult>,
    pub players_processed: usize,
    pub players_with_changes: usize,
    pub total_differences: usize,
}
