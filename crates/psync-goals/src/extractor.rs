//! Goal metric resolution.
//!
//! Each goal slot resolves through an ordered list of [`MetricSource`]s; the
//! first source that yields a value wins, and nothing at all means 0:
//!
//! 1. platform challenge progress for one of the slot's challenge ids
//! 2. the report record's field for the slot's metric
//! 3. `0.0`

use psync_core::CoreError;
use psync_core::entities::{GoalPercentages, PlatformStatus, PlayerGoals, ReportRecord};
use psync_core::enums::{Metric, MetricSlot, TeamVariant};

use crate::variants::VariantRegistry;

/// One candidate source for a goal percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    /// Progress of the first listed challenge the platform reports.
    ChallengeProgress(&'static [&'static str]),
    /// The report record's value for a metric.
    Report(Metric),
}

impl MetricSource {
    /// Raw value from this source, `None` when the source has nothing.
    #[must_use]
    pub fn lookup(&self, status: &PlatformStatus, record: Option<&ReportRecord>) -> Option<f64> {
        match self {
            Self::ChallengeProgress(ids) => ids.iter().find_map(|id| status.challenge_percent(id)),
            Self::Report(metric) => record.and_then(|record| record.value(*metric)),
        }
    }
}

/// First value any source yields, clamped; `0.0` when none does.
#[must_use]
pub fn resolve_percentage(
    sources: &[MetricSource],
    status: &PlatformStatus,
    record: Option<&ReportRecord>,
) -> f64 {
    sources
        .iter()
        .find_map(|source| source.lookup(status, record))
        .map_or(0.0, sanitize_percentage)
}

/// Non-finite and negative values become 0. There is no upper clamp.
#[must_use]
pub fn sanitize_percentage(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Resolve all three goals plus lock state and points for one player.
///
/// # Errors
///
/// Returns [`CoreError::NotFound`] if `variant` has no registered profile.
pub fn extract_goals(
    registry: &VariantRegistry,
    player_id: &str,
    variant: TeamVariant,
    status: &PlatformStatus,
    record: Option<&ReportRecord>,
) -> Result<PlayerGoals, CoreError> {
    let profile = registry.get(variant).ok_or_else(|| CoreError::NotFound {
        kind: String::from("team variant"),
        id: variant.to_string(),
    })?;

    let primary = profile.resolve_metric(status, record, MetricSlot::Primary);
    let secondary1 = profile.resolve_metric(status, record, MetricSlot::Secondary1);
    let secondary2 = profile.resolve_metric(status, record, MetricSlot::Secondary2);

    let points_locked = profile.points_locked(status, &primary);
    let points_multiplier =
        profile.points_multiplier([secondary1.boost_active, secondary2.boost_active]);
    let total_points = status.total_points * f64::from(points_multiplier);

    tracing::debug!(
        player_id,
        %variant,
        primary = primary.percentage,
        secondary1 = secondary1.percentage,
        secondary2 = secondary2.percentage,
        points_locked,
        points_multiplier,
        "resolved player goals"
    );

    Ok(PlayerGoals {
        player_id: player_id.to_string(),
        team: variant,
        primary,
        secondary1,
        secondary2,
        points_locked,
        points_multiplier,
        total_points,
    })
}

/// Goal percentages carried by a report alone, with no platform data.
///
/// Used when writing snapshots, where the report is the only source.
///
/// # Errors
///
/// Returns [`CoreError::NotFound`] if the record's team has no registered profile.
pub fn report_goal_percentages(
    registry: &VariantRegistry,
    record: &ReportRecord,
) -> Result<GoalPercentages, CoreError> {
    let goals = extract_goals(
        registry,
        &record.player_id,
        record.team,
        &PlatformStatus::default(),
        Some(record),
    )?;
    Ok(goals.percentages())
}
