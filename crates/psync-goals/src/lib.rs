//! # psync-goals
//!
//! Resolves a player's three goals (one primary, two secondary) from the
//! platform status and the latest report, and classifies each percentage into
//! a color band and a visual fill.
//!
//! Each [`TeamVariant`](psync_core::enums::TeamVariant) has its own profile
//! (see [`variants`]) holding its challenge mapping table. Profiles are looked
//! up through a [`VariantRegistry`] rather than branched on.

pub mod classifier;
pub mod collisions;
pub mod extractor;
pub mod variants;

pub use classifier::{Classification, classify};
pub use collisions::{MappingCollision, mapping_collisions};
pub use extractor::{MetricSource, extract_goals, report_goal_percentages, resolve_percentage};
pub use variants::{CatalogItems, SlotMapping, TeamProfile, VariantRegistry};
