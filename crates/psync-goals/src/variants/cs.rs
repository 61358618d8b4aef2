//! CS: customer success.

use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use super::{SlotMapping, TeamProfile};

pub struct Cs;

impl TeamProfile for Cs {
    fn variant(&self) -> TeamVariant {
        TeamVariant::Cs
    }

    fn mapping_for(&self, slot: MetricSlot) -> SlotMapping {
        match slot {
            MetricSlot::Primary => SlotMapping {
                metric: Metric::Conversoes,
                challenge_ids: &["E6HqKXf"],
            },
            MetricSlot::Secondary1 => SlotMapping {
                metric: Metric::Upa,
                challenge_ids: &["E6HqLb9"],
            },
            MetricSlot::Secondary2 => SlotMapping {
                metric: Metric::Atividade,
                challenge_ids: &["E6HqM0t"],
            },
        }
    }
}
