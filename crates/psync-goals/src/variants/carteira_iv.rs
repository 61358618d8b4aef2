//! Carteira IV: revenue-led portfolio team, second region.
//!
//! Shares its primary challenge with Carteira III. The platform also reuses
//! `E6F8I1u`, which Carteira III reads as `reaisPorAtivo`, for this team's
//! `multimarcasPorAtivo`; the collision audit reports it.

use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use super::{SlotMapping, TeamProfile};

pub struct CarteiraIv;

impl TeamProfile for CarteiraIv {
    fn variant(&self) -> TeamVariant {
        TeamVariant::CarteiraIv
    }

    fn mapping_for(&self, slot: MetricSlot) -> SlotMapping {
        match slot {
            MetricSlot::Primary => SlotMapping {
                metric: Metric::Faturamento,
                challenge_ids: &["E6F8Hp2"],
            },
            MetricSlot::Secondary1 => SlotMapping {
                metric: Metric::ReaisPorAtivo,
                challenge_ids: &["E6MMH5v"],
            },
            MetricSlot::Secondary2 => SlotMapping {
                metric: Metric::MultimarcasPorAtivo,
                challenge_ids: &["E6F8I1u"],
            },
        }
    }
}
