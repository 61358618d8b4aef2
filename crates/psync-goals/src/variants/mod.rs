//! Team variant profiles.
//!
//! One profile per [`TeamVariant`]: which metric sits in each goal slot, which
//! platform challenges report progress for it, and how points are locked and
//! multiplied. Profiles are selected through [`VariantRegistry`].

mod carteira_i;
mod carteira_ii;
mod carteira_iii;
mod carteira_iv;
mod cs;
mod er;

pub use carteira_i::CarteiraI;
pub use carteira_ii::CarteiraIi;
pub use carteira_iii::CarteiraIii;
pub use carteira_iv::CarteiraIv;
pub use cs::Cs;
pub use er::Er;

use std::collections::HashMap;

use psync_core::entities::{GoalMetric, PlatformStatus, ReportRecord};
use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use crate::classifier::classify;
use crate::collisions::mapping_collisions;
use crate::extractor::{MetricSource, resolve_percentage};

// ── Types ──────────────────────────────────────────────────────────

/// The metric behind one goal slot and the challenges that report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMapping {
    pub metric: Metric,
    /// Challenge identifiers in priority order.
    pub challenge_ids: &'static [&'static str],
}

/// Catalog items read as flags from the player's platform profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItems {
    /// Owning at least one unlocks points.
    pub points_unlock: &'static str,
    pub boost_secondary1: &'static str,
    pub boost_secondary2: &'static str,
}

pub const DEFAULT_CATALOG: CatalogItems = CatalogItems {
    points_unlock: "E6F0O5f",
    boost_secondary1: "E6F0WGc",
    boost_secondary2: "E6K79Mt",
};

// ── Profile contract ───────────────────────────────────────────────

/// Behavior of one team variant.
///
/// Implementors only provide the mapping table; resolution, locking, and the
/// point multiplier have defaults that variants override when they differ.
pub trait TeamProfile: Send + Sync {
    fn variant(&self) -> TeamVariant;

    fn mapping_for(&self, slot: MetricSlot) -> SlotMapping;

    fn catalog(&self) -> CatalogItems {
        DEFAULT_CATALOG
    }

    /// Resolve one goal slot: challenge progress, then report value, then 0.
    fn resolve_metric(
        &self,
        status: &PlatformStatus,
        record: Option<&ReportRecord>,
        slot: MetricSlot,
    ) -> GoalMetric {
        let mapping = self.mapping_for(slot);
        let percentage = resolve_percentage(&mapping.sources(), status, record);
        let classification = classify(percentage);
        GoalMetric {
            metric: mapping.metric,
            slot,
            percentage,
            boost_active: self.boost_active(status, slot),
            band: classification.band,
            visual_fill: classification.visual_fill,
        }
    }

    /// Boosts only apply to secondary goals. A missing item means inactive.
    fn boost_active(&self, status: &PlatformStatus, slot: MetricSlot) -> bool {
        let catalog = self.catalog();
        match slot {
            MetricSlot::Primary => false,
            MetricSlot::Secondary1 => status.item_count(catalog.boost_secondary1) > 0,
            MetricSlot::Secondary2 => status.item_count(catalog.boost_secondary2) > 0,
        }
    }

    /// Points are locked while the player owns no unlock item.
    fn points_locked(&self, status: &PlatformStatus, _primary: &GoalMetric) -> bool {
        status.item_count(self.catalog().points_unlock) == 0
    }

    /// Multiplier applied to the platform's point total.
    fn points_multiplier(&self, _secondary_boosts: [bool; 2]) -> u8 {
        1
    }
}

impl SlotMapping {
    /// Candidate sources for this slot, highest priority first.
    #[must_use]
    pub const fn sources(&self) -> [MetricSource; 2] {
        [
            MetricSource::ChallengeProgress(self.challenge_ids),
            MetricSource::Report(self.metric),
        ]
    }
}

// ── Registry ───────────────────────────────────────────────────────

/// Lookup table from variant tag to profile.
pub struct VariantRegistry {
    profiles: HashMap<TeamVariant, Box<dyn TeamProfile>>,
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantRegistry {
    /// Registry with the built-in profile of every variant.
    ///
    /// Challenge identifiers mapped to different metrics by two variants are
    /// logged, not resolved: each variant keeps its own table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_profiles(vec![
            Box::new(CarteiraI),
            Box::new(CarteiraIi),
            Box::new(CarteiraIii),
            Box::new(CarteiraIv),
            Box::new(Er),
            Box::new(Cs),
        ])
    }

    /// Registry from explicit profiles. A later profile for the same variant
    /// replaces an earlier one.
    #[must_use]
    pub fn with_profiles(profiles: Vec<Box<dyn TeamProfile>>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|profile| (profile.variant(), profile))
            .collect();
        let registry = Self { profiles };
        for collision in mapping_collisions(&registry) {
            tracing::warn!(
                challenge = collision.challenge_id,
                first = %collision.first,
                second = %collision.second,
                "challenge id mapped to different metrics by two team variants"
            );
        }
        registry
    }

    #[must_use]
    pub fn get(&self, variant: TeamVariant) -> Option<&dyn TeamProfile> {
        self.profiles.get(&variant).map(|profile| &**profile)
    }

    /// Registered profiles in [`TeamVariant::ALL`] order.
    pub fn profiles(&self) -> impl Iterator<Item = &dyn TeamProfile> {
        TeamVariant::ALL
            .into_iter()
            .filter_map(|variant| self.get(variant))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_variant_is_registered() {
        let registry = VariantRegistry::new();
        for variant in TeamVariant::ALL {
            let profile = registry.get(variant).expect("variant registered");
            assert_eq!(profile.variant(), variant);
        }
        assert_eq!(registry.profiles().count(), TeamVariant::ALL.len());
    }

    #[test]
    fn each_variant_has_three_distinct_goals() {
        let registry = VariantRegistry::new();
        for profile in registry.profiles() {
            let metrics: HashSet<Metric> = MetricSlot::ALL
                .into_iter()
                .map(|slot| profile.mapping_for(slot).metric)
                .collect();
            assert_eq!(metrics.len(), 3, "{} reuses a metric", profile.variant());
            for slot in MetricSlot::ALL {
                assert!(
                    !profile.mapping_for(slot).challenge_ids.is_empty(),
                    "{} {slot} has no challenges",
                    profile.variant()
                );
            }
        }
    }

    #[test]
    fn missing_boost_items_mean_inactive() {
        let status = PlatformStatus::default();
        let profile = CarteiraI;
        for slot in MetricSlot::ALL {
            assert!(!profile.boost_active(&status, slot));
        }
    }

    #[test]
    fn primary_never_boosted() {
        let mut status = PlatformStatus::default();
        status.catalog_items.insert(DEFAULT_CATALOG.boost_secondary1.into(), 1);
        status.catalog_items.insert(DEFAULT_CATALOG.boost_secondary2.into(), 1);
        let profile = Er;
        assert!(!profile.boost_active(&status, MetricSlot::Primary));
        assert!(profile.boost_active(&status, MetricSlot::Secondary1));
        assert!(profile.boost_active(&status, MetricSlot::Secondary2));
    }

    #[test]
    fn with_profiles_keeps_last_profile_per_variant() {
        let registry = VariantRegistry::with_profiles(vec![Box::new(Er)]);
        assert!(registry.get(TeamVariant::Er).is_some());
        assert!(registry.get(TeamVariant::Cs).is_none());
    }
}
