use std::sync::Arc;

use anyhow::Context;
use psync_config::PsyncConfig;
use psync_sync::{PlatformClient, SubmitProgress, SyncOutcome, SyncPipeline};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::root_commands::SyncArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::files::{read_reports, write_json};
use crate::output::output;
use crate::progress::{Spinner, SubmitBar};

/// One-screen view of an upload for table output.
#[derive(Debug, Serialize)]
struct SyncSummary {
    cycle_number: u32,
    is_new_cycle: bool,
    players_processed: usize,
    players_with_changes: usize,
    action_logs: usize,
    submitted: usize,
    failed: usize,
    snapshots_written: usize,
    snapshot_failures: usize,
    summary: String,
}

impl From<&SyncOutcome> for SyncSummary {
    fn from(outcome: &SyncOutcome) -> Self {
        Self {
            cycle_number: outcome.comparison.cycle_number,
            is_new_cycle: outcome.comparison.is_new_cycle,
            players_processed: outcome.comparison.players_processed,
            players_with_changes: outcome.comparison.players_with_changes,
            action_logs: outcome.action_logs.len(),
            submitted: outcome.batch.succeeded,
            failed: outcome.batch.failed,
            snapshots_written: outcome.snapshots_written,
            snapshot_failures: outcome.snapshot_failures,
            summary: outcome.batch.summary.clone(),
        }
    }
}

/// Handle `psync sync`.
pub async fn handle(args: &SyncArgs, config: &PsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let records = read_reports(&args.report)?;
    let store = Arc::new(bootstrap::snapshot_store(config)?);

    // A dry run never reaches the platform, so it does not need credentials.
    let client = if args.dry_run {
        PlatformClient::new(&config.platform).context("failed to build platform client")?
    } else {
        bootstrap::platform_client(config)?
    };
    let pipeline = SyncPipeline::from_config(store, client, config)?;

    if args.dry_run {
        let spinner = Spinner::start("comparing against stored snapshots");
        let plan = pipeline.plan(&records, args.cycle, args.new_cycle).await;
        spinner.finish_clear();
        return output(&plan, flags.format);
    }

    tracing::info!(
        records = records.len(),
        cycle = args.cycle,
        new_cycle = args.new_cycle,
        "starting upload"
    );
    let mut bar: Option<SubmitBar> = None;
    let outcome = pipeline
        .run(
            &records,
            args.cycle,
            args.new_cycle,
            &bootstrap::credentials(config),
            &mut |event: SubmitProgress| {
                bar.get_or_insert_with(|| SubmitBar::new(event.total)).update(event);
            },
        )
        .await;
    if let Some(bar) = &bar {
        bar.finish(&outcome.batch.summary);
    }

    if let Some(path) = &args.result_out {
        write_json(path, &outcome.batch)?;
    } else if outcome.batch.failed > 0 {
        tracing::warn!("rerun with --result-out to keep the failed action logs for `psync retry`");
    }

    match flags.format {
        OutputFormat::Table => output(&SyncSummary::from(&outcome), flags.format)?,
        OutputFormat::Json | OutputFormat::Raw => output(&outcome, flags.format)?,
    }

    if outcome.batch.failed > 0 {
        anyhow::bail!("{} of {} action logs failed", outcome.batch.failed, outcome.batch.total);
    }
    Ok(())
}
