use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::GoalPercentages;
use crate::enums::{Metric, TeamVariant, Trend};

/// Calendar bounds of one cycle, derived from its reports.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CycleInfo {
    pub cycle_number: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: u32,
    /// `true` once `end_date` has passed.
    pub is_completed: bool,
}

/// Final state of one cycle for one player.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CycleHistoryData {
    pub cycle: CycleInfo,
    pub team: TeamVariant,
    pub final_goals: GoalPercentages,
    pub final_metrics: BTreeMap<Metric, f64>,
    pub upload_count: usize,
}

/// One upload on a cycle's progress timeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProgressDataPoint {
    /// 1-based upload sequence within the cycle.
    pub sequence: usize,
    pub uploaded_at: DateTime<Utc>,
    pub report_date: String,
    pub cycle_day: u32,
    pub goals: GoalPercentages,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CycleDetails {
    pub history: CycleHistoryData,
    pub timeline: Vec<ProgressDataPoint>,
}

/// Roll-up statistics over a player's completed cycles.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CycleSummaryStats {
    pub total_cycles: usize,
    pub average: GoalPercentages,
    pub average_overall: f64,
    pub best_cycle: Option<u32>,
    pub worst_cycle: Option<u32>,
    pub trend: Trend,
}

/// Deltas between two cycles (`cycle_b − cycle_a`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CycleComparison {
    pub cycle_a: u32,
    pub cycle_b: u32,
    pub deltas: GoalPercentages,
    pub total_improvement: f64,
    pub summary: String,
}
