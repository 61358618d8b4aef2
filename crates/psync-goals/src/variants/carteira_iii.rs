//! Carteira III: revenue-led portfolio team.

use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use super::{SlotMapping, TeamProfile};

pub struct CarteiraIii;

impl TeamProfile for CarteiraIii {
    fn variant(&self) -> TeamVariant {
        TeamVariant::CarteiraIii
    }

    fn mapping_for(&self, slot: MetricSlot) -> SlotMapping {
        match slot {
            MetricSlot::Primary => SlotMapping {
                metric: Metric::Faturamento,
                challenge_ids: &["E6F8HMK", "E6F8Hp2"],
            },
            MetricSlot::Secondary1 => SlotMapping {
                metric: Metric::ReaisPorAtivo,
                challenge_ids: &["E6F8I1u"],
            },
            MetricSlot::Secondary2 => SlotMapping {
                metric: Metric::MultimarcasPorAtivo,
                challenge_ids: &["E6F8ImV"],
            },
        }
    }
}
