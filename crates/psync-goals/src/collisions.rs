//! Cross-variant challenge mapping audit.
//!
//! The platform has been seen reusing one challenge identifier for different
//! metrics in different teams. Resolution stays per variant, so a collision
//! does not change any result, but operators need to see it.

use std::fmt;

use psync_core::enums::{Metric, MetricSlot, TeamVariant};
use serde::Serialize;

use crate::variants::VariantRegistry;

/// Where a challenge identifier is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingSide {
    pub variant: TeamVariant,
    pub slot: MetricSlot,
    pub metric: Metric,
}

impl fmt::Display for MappingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.variant, self.slot, self.metric)
    }
}

/// A challenge identifier that two variants map to different metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingCollision {
    pub challenge_id: &'static str,
    pub first: MappingSide,
    pub second: MappingSide,
}

/// Every cross-variant collision in the registry, in registry order.
///
/// Reuse of an identifier for the *same* metric is not a collision.
#[must_use]
pub fn mapping_collisions(registry: &VariantRegistry) -> Vec<MappingCollision> {
    let mut seen: Vec<(&'static str, MappingSide)> = Vec::new();
    let mut collisions = Vec::new();

    for profile in registry.profiles() {
        for slot in MetricSlot::ALL {
            let mapping = profile.mapping_for(slot);
            let side = MappingSide {
                variant: profile.variant(),
                slot,
                metric: mapping.metric,
            };
            for &challenge_id in mapping.challenge_ids {
                for (seen_id, seen_side) in &seen {
                    if *seen_id == challenge_id
                        && seen_side.variant != side.variant
                        && seen_side.metric != side.metric
                    {
                        collisions.push(MappingCollision {
                            challenge_id,
                            first: *seen_side,
                            second: side,
                        });
                    }
                }
                seen.push((challenge_id, side));
            }
        }
    }

    collisions
}
