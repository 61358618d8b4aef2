use anyhow::Context;
use psync_config::PsyncConfig;
use psync_core::entities::{PlayerGoals, ReportRecord};
use psync_core::enums::TeamVariant;
use psync_goals::{VariantRegistry, extract_goals};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::root_commands::GoalsArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::files::read_reports;
use crate::commands::shared::parse::parse_enum;
use crate::output::output;
use crate::progress::Spinner;

#[derive(Debug, Serialize)]
struct GoalRow {
    slot: String,
    metric: String,
    percentage: f64,
    band: String,
    boosted: bool,
    fill: f64,
}

fn goal_rows(goals: &PlayerGoals) -> Vec<GoalRow> {
    [&goals.primary, &goals.secondary1, &goals.secondary2]
        .into_iter()
        .map(|goal| GoalRow {
            slot: goal.slot.to_string(),
            metric: goal.metric.to_string(),
            percentage: goal.percentage,
            band: goal.band.to_string(),
            boosted: goal.boost_active,
            fill: goal.visual_fill,
        })
        .collect()
}

/// The player's record in a report, when one is given.
fn report_record(
    path: Option<&std::path::Path>,
    player: &str,
    team: TeamVariant,
) -> anyhow::Result<Option<ReportRecord>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let record = read_reports(path)?
        .into_iter()
        .rev()
        .find(|record| record.player_id == player);
    match &record {
        None => tracing::warn!(player, "player not in report, using platform data only"),
        Some(record) if record.team != team => {
            tracing::warn!(player, report_team = %record.team, %team, "report lists a different team");
        }
        Some(_) => {}
    }
    Ok(record)
}

/// Handle `psync goals`.
pub async fn handle(args: &GoalsArgs, config: &PsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let team: TeamVariant = parse_enum(&args.team, "team")?;
    let record = report_record(args.report.as_deref(), &args.player, team)?;

    let client = bootstrap::platform_client(config)?;
    let spinner = Spinner::start("fetching player status");
    let status = client
        .fetch_player_status(&args.player, &bootstrap::credentials(config))
        .await;
    spinner.finish_clear();
    let status = status.with_context(|| format!("failed to fetch status of player {}", args.player))?;

    let goals = extract_goals(&VariantRegistry::new(), &args.player, team, &status, record.as_ref())?;

    match flags.format {
        OutputFormat::Table => {
            output(&goal_rows(&goals), flags.format)?;
            if !flags.quiet {
                let lock = if goals.points_locked { "locked" } else { "unlocked" };
                println!(
                    "points: {:.0} (x{}, {lock})",
                    goals.total_points, goals.points_multiplier
                );
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(&goals, flags.format),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use psync_core::entities::PlatformStatus;
    use psync_core::enums::Metric;

    use super::*;

    #[test]
    fn rows_follow_slot_order() {
        let status = PlatformStatus::default();
        let record = ReportRecord::new("P1", TeamVariant::CarteiraI, 5, 21, "2025-03-14")
            .with_metric(Metric::Atividade, 120.0);
        let goals = extract_goals(&VariantRegistry::new(), "P1", TeamVariant::CarteiraI, &status, Some(&record))
            .expect("goals");

        let rows = goal_rows(&goals);

        let slots: Vec<&str> = rows.iter().map(|row| row.slot.as_str()).collect();
        assert_eq!(slots, vec!["primary", "secondary1", "secondary2"]);
        assert!(rows.iter().all(|row| (0.0..=1.0).contains(&row.fill)));
    }

    #[test]
    fn report_record_picks_the_player_line() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"{{"playerId": "P1", "team": "er", "upa": 3, "cycleDay": 2, "totalCycleDays": 21, "reportDate": "2025-03-11"}}"#
        )
        .expect("write");
        writeln!(
            file,
            r#"{{"playerId": "P2", "team": "er", "upa": 7, "cycleDay": 2, "totalCycleDays": 21, "reportDate": "2025-03-11"}}"#
        )
        .expect("write");

        let record = report_record(Some(file.path()), "P2", TeamVariant::Er)
            .expect("read")
            .expect("record");
        assert_eq!(record.value(Metric::Upa), Some(7.0));

        assert!(report_record(Some(file.path()), "P9", TeamVariant::Er).expect("read").is_none());
        assert!(report_record(None, "P1", TeamVariant::Er).expect("no file").is_none());
    }
}
