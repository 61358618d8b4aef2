//! Carteira I: activity-led portfolio team.

use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use super::{SlotMapping, TeamProfile};

pub struct CarteiraI;

impl TeamProfile for CarteiraI {
    fn variant(&self) -> TeamVariant {
        TeamVariant::CarteiraI
    }

    fn mapping_for(&self, slot: MetricSlot) -> SlotMapping {
        match slot {
            MetricSlot::Primary => SlotMapping {
                metric: Metric::Atividade,
                challenge_ids: &["E6FQIjs"],
            },
            MetricSlot::Secondary1 => SlotMapping {
                metric: Metric::ReaisPorAtivo,
                challenge_ids: &["E6Gm8RI"],
            },
            MetricSlot::Secondary2 => SlotMapping {
                metric: Metric::Faturamento,
                challenge_ids: &["E6GglPq"],
            },
        }
    }
}
