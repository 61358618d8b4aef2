//! End-to-end upload: compare, generate, submit, write snapshots back.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use psync_config::{ConfigError, PsyncConfig};
use psync_core::entities::{
    ActionLog, BatchResult, ComparisonReport, ComparisonResult, ItemResult, ReportRecord,
    StoredSnapshot,
};
use psync_core::enums::{Metric, SnapshotOrigin};
use psync_goals::{VariantRegistry, report_goal_percentages};
use psync_store::SnapshotStore;
use psync_store::snapshots::{insert_snapshot, latest_snapshot};
use serde::Serialize;

use crate::comparator::Comparator;
use crate::generator::ActionLogGenerator;
use crate::submitter::{BatchSubmitter, SubmitProgress, SubmitterSettings};
use crate::transport::{Credentials, PlatformTransport};

/// Reason recorded for retried items whose baseline a later upload moved.
pub const SUPERSEDED: &str = "superseded by a later upload";

const BASELINE_TOLERANCE: f64 = 1e-9;

/// What an upload would submit. Produced without touching the platform.
#[derive(Debug, Clone, Serialize)]
pub struct SyncPlan {
    pub comparison: ComparisonReport,
    pub action_logs: Vec<ActionLog>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub comparison: ComparisonReport,
    pub action_logs: Vec<ActionLog>,
    pub batch: BatchResult,
    pub snapshots_written: usize,
    pub snapshot_failures: usize,
}

/// Result of re-submitting the failures of an earlier upload.
#[derive(Debug, Clone, Serialize)]
pub struct RetryOutcome {
    pub batch: BatchResult,
    pub snapshots_written: usize,
    pub snapshot_failures: usize,
}

pub struct SyncPipeline<S, T> {
    store: Arc<S>,
    comparator: Comparator<S>,
    generator: ActionLogGenerator,
    submitter: BatchSubmitter<T>,
    registry: VariantRegistry,
}

impl<S, T> SyncPipeline<S, T>
where
    S: SnapshotStore + 'static,
    T: PlatformTransport,
{
    #[must_use]
    pub fn new(
        store: Arc<S>,
        comparator: Comparator<S>,
        generator: ActionLogGenerator,
        submitter: BatchSubmitter<T>,
        registry: VariantRegistry,
    ) -> Self {
        Self {
            store,
            comparator,
            generator,
            submitter,
            registry,
        }
    }

    /// Wire every stage from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the action table is invalid.
    pub fn from_config(
        store: Arc<S>,
        transport: T,
        config: &PsyncConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Arc::clone(&store),
            Comparator::new(Arc::clone(&store), &config.sync),
            ActionLogGenerator::from_config(&config.actions)?,
            BatchSubmitter::new(transport, SubmitterSettings::from(&config.sync)),
            VariantRegistry::new(),
        ))
    }

    #[must_use]
    pub const fn submitter(&self) -> &BatchSubmitter<T> {
        &self.submitter
    }

    /// Compare and generate only.
    pub async fn plan(
        &self,
        batch: &[ReportRecord],
        cycle_number: u32,
        is_new_cycle: bool,
    ) -> SyncPlan {
        let comparison = self
            .comparator
            .compare(batch, cycle_number, is_new_cycle)
            .await;
        let action_logs = self.generator.generate(&comparison.results);
        SyncPlan {
            comparison,
            action_logs,
        }
    }

    /// Run a full upload.
    ///
    /// Every record gets a snapshot. Metrics whose action log did not go
    /// through keep their baseline value in it, so the next upload
    /// computes the same delta again.
    pub async fn run<F>(
        &self,
        batch: &[ReportRecord],
        cycle_number: u32,
        is_new_cycle: bool,
        credentials: &Credentials,
        progress: &mut F,
    ) -> SyncOutcome
    where
        F: FnMut(SubmitProgress) + Send,
    {
        let SyncPlan {
            comparison,
            action_logs,
        } = self.plan(batch, cycle_number, is_new_cycle).await;

        let submitted = self
            .submitter
            .submit_batch(&action_logs, credentials, progress)
            .await;

        let (snapshots_written, snapshot_failures) = self
            .write_snapshots(batch, &comparison, &submitted, Utc::now())
            .await;
        tracing::info!(
            cycle_number,
            snapshots_written,
            snapshot_failures,
            "upload finished: {}",
            submitted.summary
        );

        SyncOutcome {
            comparison,
            action_logs,
            batch: submitted,
            snapshots_written,
            snapshot_failures,
        }
    }

    /// Re-submit the failed items of an earlier upload of `cycle_number`.
    ///
    /// An item is only sent again while the player's latest snapshot still
    /// holds the value its delta was computed from. Once a later upload has
    /// moved that metric, the item fails with [`SUPERSEDED`] and nothing is
    /// sent. Metrics that go through are recorded in a new snapshot built on
    /// the latest one, so the next upload does not send them again.
    pub async fn retry<F>(
        &self,
        previous: &BatchResult,
        cycle_number: u32,
        credentials: &Credentials,
        progress: &mut F,
    ) -> RetryOutcome
    where
        F: FnMut(SubmitProgress) + Send,
    {
        let mut baselines: BTreeMap<String, Result<Option<StoredSnapshot>, String>> = BTreeMap::new();
        for item in previous.results.iter().filter(|item| !item.success) {
            let player_id = &item.action_log.player_id;
            if baselines.contains_key(player_id) {
                continue;
            }
            let baseline = latest_snapshot(self.store.as_ref(), player_id, cycle_number)
                .await
                .map_err(|e| e.to_string());
            baselines.insert(player_id.clone(), baseline);
        }

        let mut skipped = Vec::new();
        let mut current = Vec::new();
        for item in previous.results.iter().filter(|item| !item.success) {
            let log = &item.action_log;
            let reason = match baselines.get(&log.player_id) {
                Some(Ok(snapshot)) if computed_from(log, snapshot.as_ref()) => None,
                Some(Err(e)) => Some(format!("baseline lookup failed: {e}")),
                _ => Some(SUPERSEDED.to_string()),
            };
            match reason {
                None => current.push(item.clone()),
                Some(reason) => {
                    tracing::warn!(
                        player_id = %log.player_id,
                        action_id = %log.action_id,
                        %reason,
                        "not retrying action log"
                    );
                    skipped.push(ItemResult {
                        error: Some(reason),
                        attempts: 0,
                        ..item.clone()
                    });
                }
            }
        }

        let resent = self
            .submitter
            .retry_failed(&BatchResult::from_items(current), credentials, progress)
            .await;

        let mut applied: BTreeMap<&str, Vec<(Metric, f64)>> = BTreeMap::new();
        for item in resent.results.iter().filter(|item| item.success) {
            applied
                .entry(item.action_log.player_id.as_str())
                .or_default()
                .push((item.action_log.audit.metric, item.action_log.audit.new_value));
        }

        let uploaded_at = Utc::now();
        let mut written = 0;
        let mut failures = 0;
        for (player_id, metrics) in applied {
            let Some(Ok(Some(latest))) = baselines.get(player_id) else {
                tracing::warn!(player_id, cycle_number, "no snapshot to carry the retried metrics");
                failures += 1;
                continue;
            };
            let mut snapshot = latest.clone();
            snapshot.metrics.extend(metrics);
            snapshot.origin = SnapshotOrigin::Retry;
            // Must sort after the snapshot it extends.
            snapshot.uploaded_at = uploaded_at.max(latest.uploaded_at + TimeDelta::milliseconds(1));
            match insert_snapshot(self.store.as_ref(), &snapshot).await {
                Ok(()) => written += 1,
                Err(e) => {
                    tracing::warn!(player_id, %e, "snapshot write failed");
                    failures += 1;
                }
            }
        }

        let mut results = resent.results;
        results.extend(skipped);
        results.sort_by_key(|item| item.index);
        let batch = BatchResult::from_items(results);
        tracing::info!(cycle_number, written, failures, "retry finished: {}", batch.summary);

        RetryOutcome {
            batch,
            snapshots_written: written,
            snapshot_failures: failures,
        }
    }

    async fn write_snapshots(
        &self,
        batch: &[ReportRecord],
        comparison: &ComparisonReport,
        submitted: &BatchResult,
        uploaded_at: DateTime<Utc>,
    ) -> (usize, usize) {
        let applied: HashSet<(&str, Metric)> = submitted
            .results
            .iter()
            .filter(|item| item.success)
            .map(|item| (item.action_log.player_id.as_str(), item.action_log.audit.metric))
            .collect();

        let mut written = 0;
        let mut failures = 0;
        for (record, result) in batch.iter().zip(&comparison.results) {
            let goals = match report_goal_percentages(&self.registry, record) {
                Ok(goals) => goals,
                Err(e) => {
                    tracing::warn!(player_id = %record.player_id, %e, "cannot derive goals, snapshot not written");
                    failures += 1;
                    continue;
                }
            };
            let snapshot = StoredSnapshot {
                player_id: record.player_id.clone(),
                team: record.team,
                cycle_number: comparison.cycle_number,
                uploaded_at,
                report_date: record.report_date.clone(),
                cycle_day: record.cycle_day,
                total_cycle_days: record.total_cycle_days,
                metrics: confirmed_metrics(record, result, &applied),
                goals,
                origin: SnapshotOrigin::Upload,
            };
            match insert_snapshot(self.store.as_ref(), &snapshot).await {
                Ok(()) => written += 1,
                Err(e) => {
                    tracing::warn!(player_id = %record.player_id, %e, "snapshot write failed");
                    failures += 1;
                }
            }
        }
        (written, failures)
    }
}

/// Whether `log`'s delta was computed from the value `snapshot` holds now.
/// A metric the snapshot lacks counts as 0.
fn computed_from(log: &ActionLog, snapshot: Option<&StoredSnapshot>) -> bool {
    let stored = snapshot
        .and_then(|snapshot| snapshot.metric(log.audit.metric))
        .unwrap_or(0.0);
    (stored - log.audit.previous_value).abs() < BASELINE_TOLERANCE
}

/// Report values, except metrics with an unapplied update keep their old value.
fn confirmed_metrics(
    record: &ReportRecord,
    result: &ComparisonResult,
    applied: &HashSet<(&str, Metric)>,
) -> BTreeMap<Metric, f64> {
    record
        .present_metrics()
        .into_iter()
        .map(|(metric, value)| {
            let unapplied = result.differences.iter().find(|d| {
                d.metric == metric
                    && d.requires_update
                    && !applied.contains(&(d.player_id.as_str(), d.metric))
            });
            (metric, unapplied.map_or(value, |d| d.old_value))
        })
        .collect()
}
