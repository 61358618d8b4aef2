use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{GoalPercentages, parse_report_day};
use crate::enums::{Metric, SnapshotOrigin, TeamVariant};

/// A stored, platform-confirmed record of a player's metrics at one upload.
///
/// Many snapshots may exist per player and cycle; the one with the latest
/// `uploaded_at` is the comparison baseline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StoredSnapshot {
    pub player_id: String,
    pub team: TeamVariant,
    pub cycle_number: u32,
    /// Epoch milliseconds on the wire so stores order it numerically.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schemars(with = "i64")]
    pub uploaded_at: DateTime<Utc>,
    pub report_date: String,
    pub cycle_day: u32,
    pub total_cycle_days: u32,
    #[serde(default)]
    pub metrics: BTreeMap<Metric, f64>,
    #[serde(default)]
    pub goals: GoalPercentages,
    /// Documents written before origins were recorded read as uploads.
    #[serde(default)]
    pub origin: SnapshotOrigin,
}

impl StoredSnapshot {
    #[must_use]
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    #[must_use]
    pub const fn is_upload(&self) -> bool {
        matches!(self.origin, SnapshotOrigin::Upload)
    }

    #[must_use]
    pub fn report_day(&self) -> Option<NaiveDate> {
        parse_report_day(&self.report_date)
    }
}
