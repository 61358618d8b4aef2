use chrono::NaiveDate;
use psync_config::PsyncConfig;
use psync_core::entities::{CycleDetails, CycleHistoryData};
use psync_history::CycleAggregator;
use psync_store::HttpStore;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::root_commands::{CompareArgs, CycleArgs, PlayerArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Flat per-cycle row for table output.
#[derive(Debug, Serialize)]
struct CycleRow {
    cycle: u32,
    start: NaiveDate,
    end: NaiveDate,
    completed: bool,
    primary: f64,
    secondary1: f64,
    secondary2: f64,
    uploads: usize,
}

impl From<&CycleHistoryData> for CycleRow {
    fn from(data: &CycleHistoryData) -> Self {
        Self {
            cycle: data.cycle.cycle_number,
            start: data.cycle.start_date,
            end: data.cycle.end_date,
            completed: data.cycle.is_completed,
            primary: data.final_goals.primary,
            secondary1: data.final_goals.secondary1,
            secondary2: data.final_goals.secondary2,
            uploads: data.upload_count,
        }
    }
}

#[derive(Debug, Serialize)]
struct TimelineRow {
    sequence: usize,
    uploaded_at: String,
    report_date: String,
    cycle_day: u32,
    primary: f64,
    secondary1: f64,
    secondary2: f64,
}

fn timeline_rows(details: &CycleDetails) -> Vec<TimelineRow> {
    details
        .timeline
        .iter()
        .map(|point| TimelineRow {
            sequence: point.sequence,
            uploaded_at: point.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
            report_date: point.report_date.clone(),
            cycle_day: point.cycle_day,
            primary: point.goals.primary,
            secondary1: point.goals.secondary1,
            secondary2: point.goals.secondary2,
        })
        .collect()
}

fn aggregator(config: &PsyncConfig) -> anyhow::Result<CycleAggregator<HttpStore>> {
    Ok(CycleAggregator::new(bootstrap::snapshot_store(config)?))
}

/// Handle `psync history`.
pub async fn handle_history(args: &PlayerArgs, config: &PsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let history = aggregator(config)?
        .get_player_cycle_history(&args.player)
        .await?;
    match flags.format {
        OutputFormat::Table => output(&history.iter().map(CycleRow::from).collect::<Vec<_>>(), flags.format),
        OutputFormat::Json | OutputFormat::Raw => output(&history, flags.format),
    }
}

/// Handle `psync cycle`.
pub async fn handle_cycle(args: &CycleArgs, config: &PsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let details = aggregator(config)?
        .get_cycle_details(&args.player, args.cycle)
        .await?;
    match flags.format {
        OutputFormat::Table => {
            output(&CycleRow::from(&details.history), flags.format)?;
            println!();
            output(&timeline_rows(&details), flags.format)
        }
        OutputFormat::Json | OutputFormat::Raw => output(&details, flags.format),
    }
}

/// Handle `psync stats`.
pub async fn handle_stats(args: &PlayerArgs, config: &PsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stats = aggregator(config)?
        .get_cycle_summary_stats(&args.player)
        .await?;
    output(&stats, flags.format)
}

/// Handle `psync compare`.
pub async fn handle_compare(args: &CompareArgs, config: &PsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let comparison = aggregator(config)?
        .compare_cycles(&args.player, args.cycle_a, args.cycle_b)
        .await?;
    output(&comparison, flags.format)
}
