//! ER: field sales representatives.

use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use super::{SlotMapping, TeamProfile};

pub struct Er;

impl TeamProfile for Er {
    fn variant(&self) -> TeamVariant {
        TeamVariant::Er
    }

    fn mapping_for(&self, slot: MetricSlot) -> SlotMapping {
        match slot {
            MetricSlot::Primary => SlotMapping {
                metric: Metric::Faturamento,
                challenge_ids: &["E6Gv58l"],
            },
            MetricSlot::Secondary1 => SlotMapping {
                metric: Metric::Upa,
                challenge_ids: &["E6GvWkr"],
            },
            MetricSlot::Secondary2 => SlotMapping {
                metric: Metric::Conversoes,
                challenge_ids: &["E6Gvr9v"],
            },
        }
    }
}
