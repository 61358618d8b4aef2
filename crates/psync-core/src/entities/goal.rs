use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Metric, MetricSlot, ProgressBand, TeamVariant};

/// A resolved goal, created fresh per extraction call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GoalMetric {
    pub metric: Metric,
    pub slot: MetricSlot,
    pub percentage: f64,
    pub boost_active: bool,
    pub band: ProgressBand,
    /// Fraction of the full visual scale, in `[0, 1]`.
    pub visual_fill: f64,
}

/// Everything the extractor resolves for one player.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PlayerGoals {
    pub player_id: String,
    pub team: TeamVariant,
    pub primary: GoalMetric,
    pub secondary1: GoalMetric,
    pub secondary2: GoalMetric,
    pub points_locked: bool,
    pub points_multiplier: u8,
    pub total_points: f64,
}

impl PlayerGoals {
    #[must_use]
    pub const fn goal(&self, slot: MetricSlot) -> &GoalMetric {
        match slot {
            MetricSlot::Primary => &self.primary,
            MetricSlot::Secondary1 => &self.secondary1,
            MetricSlot::Secondary2 => &self.secondary2,
        }
    }

    #[must_use]
    pub const fn percentages(&self) -> GoalPercentages {
        GoalPercentages {
            primary: self.primary.percentage,
            secondary1: self.secondary1.percentage,
            secondary2: self.secondary2.percentage,
        }
    }
}

/// The three goal percentages of a team, by slot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GoalPercentages {
    pub primary: f64,
    pub secondary1: f64,
    pub secondary2: f64,
}

impl GoalPercentages {
    #[must_use]
    pub const fn get(&self, slot: MetricSlot) -> f64 {
        match slot {
            MetricSlot::Primary => self.primary,
            MetricSlot::Secondary1 => self.secondary1,
            MetricSlot::Secondary2 => self.secondary2,
        }
    }

    /// Mean of the three goals.
    #[must_use]
    pub fn mean(&self) -> f64 {
        (self.primary + self.secondary1 + self.secondary2) / 3.0
    }
}
