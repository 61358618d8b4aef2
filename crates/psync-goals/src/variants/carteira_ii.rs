//! Carteira II: ticket-led portfolio team with locally computed points.
//!
//! The platform does not lock or multiply points for this team, so both are
//! derived here:
//! - points unlock once the primary goal reaches 100%
//! - the total is multiplied by `1 + active secondary boosts` (1×, 2×, 3×)

use psync_core::entities::{GoalMetric, PlatformStatus};
use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use super::{SlotMapping, TeamProfile};

const UNLOCK_THRESHOLD: f64 = 100.0;

pub struct CarteiraIi;

impl TeamProfile for CarteiraIi {
    fn variant(&self) -> TeamVariant {
        TeamVariant::CarteiraIi
    }

    fn mapping_for(&self, slot: MetricSlot) -> SlotMapping {
        match slot {
            MetricSlot::Primary => SlotMapping {
                metric: Metric::ReaisPorAtivo,
                challenge_ids: &["E6Gahd4"],
            },
            MetricSlot::Secondary1 => SlotMapping {
                metric: Metric::Atividade,
                challenge_ids: &["E6Gke5g"],
            },
            MetricSlot::Secondary2 => SlotMapping {
                metric: Metric::MultimarcasPorAtivo,
                challenge_ids: &["E6MTIIK"],
            },
        }
    }

    fn points_locked(&self, _status: &PlatformStatus, primary: &GoalMetric) -> bool {
        primary.percentage < UNLOCK_THRESHOLD
    }

    fn points_multiplier(&self, secondary_boosts: [bool; 2]) -> u8 {
        1 + secondary_boosts.iter().map(|&active| u8::from(active)).sum::<u8>()
    }
}
