use psync_core::enums::MetricSlot;
use psync_goals::{MappingCollision, TeamProfile, VariantRegistry, mapping_collisions};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

#[derive(Debug, Serialize)]
struct MappingRow {
    variant: String,
    slot: String,
    metric: String,
    challenges: String,
    boost_item: String,
}

#[derive(Debug, Serialize)]
struct VariantsReport {
    mappings: Vec<MappingRow>,
    collisions: Vec<MappingCollision>,
}

fn build_report(registry: &VariantRegistry) -> VariantsReport {
    let mappings = registry
        .profiles()
        .flat_map(|profile| MetricSlot::ALL.into_iter().map(move |slot| mapping_row(profile, slot)))
        .collect();
    VariantsReport {
        mappings,
        collisions: mapping_collisions(registry),
    }
}

fn mapping_row(profile: &dyn TeamProfile, slot: MetricSlot) -> MappingRow {
    let mapping = profile.mapping_for(slot);
    let catalog = profile.catalog();
    let boost_item = match slot {
        MetricSlot::Primary => "-",
        MetricSlot::Secondary1 => catalog.boost_secondary1,
        MetricSlot::Secondary2 => catalog.boost_secondary2,
    };
    MappingRow {
        variant: profile.variant().to_string(),
        slot: slot.to_string(),
        metric: mapping.metric.to_string(),
        challenges: mapping.challenge_ids.join(", "),
        boost_item: boost_item.to_string(),
    }
}

/// Handle `psync variants`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = build_report(&VariantRegistry::new());
    match flags.format {
        OutputFormat::Table => {
            output(&report.mappings, flags.format)?;
            for collision in &report.collisions {
                println!(
                    "collision: {} is {} and {}",
                    collision.challenge_id, collision.first, collision.second
                );
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format),
    }
}

#[cfg(test)]
mod tests {
    use psync_core::enums::TeamVariant;

    use super::*;

    #[test]
    fn every_variant_has_three_rows() {
        let report = build_report(&VariantRegistry::new());
        assert_eq!(report.mappings.len(), TeamVariant::ALL.len() * 3);
        assert!(report.mappings.iter().all(|row| !row.challenges.is_empty()));
    }

    #[test]
    fn known_collision_is_listed() {
        let report = build_report(&VariantRegistry::new());
        assert!(
            report
                .collisions
                .iter()
                .any(|collision| collision.challenge_id == "E6F8I1u")
        );
    }
}
