//! Diff engine: report records against each player's latest stored snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use psync_config::SyncConfig;
use psync_core::entities::{
    ComparisonReport, ComparisonResult, MetricDifference, ReportRecord, StoredSnapshot,
};
use psync_store::SnapshotStore;
use psync_store::snapshots::{latest_snapshot, latest_snapshots};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Compares report batches against stored baselines.
///
/// Baselines are fetched with one grouped aggregate; if that fails, each
/// player is looked up on its own with bounded parallelism. A failed lookup
/// only affects its player, who is then compared against a zero baseline.
pub struct Comparator<S> {
    store: Arc<S>,
    tolerance: f64,
    lookup_concurrency: usize,
}

impl<S: SnapshotStore + 'static> Comparator<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &SyncConfig) -> Self {
        Self {
            store,
            tolerance: config.tolerance,
            lookup_concurrency: config.lookup_concurrency.max(1),
        }
    }

    /// Compare a batch for one cycle.
    ///
    /// With `is_new_cycle` no lookup is made and every present metric is a
    /// difference from 0.
    pub async fn compare(
        &self,
        batch: &[ReportRecord],
        cycle_number: u32,
        is_new_cycle: bool,
    ) -> ComparisonReport {
        let baselines = if is_new_cycle {
            HashMap::new()
        } else {
            self.baselines(batch, cycle_number).await
        };

        let results: Vec<ComparisonResult> = batch
            .iter()
            .map(|record| diff_record(record, baselines.get(&record.player_id), self.tolerance))
            .collect();

        let report = ComparisonReport {
            cycle_number,
            is_new_cycle,
            players_processed: results.len(),
            players_with_changes: results.iter().filter(|r| r.has_changes).count(),
            total_differences: results.iter().map(|r| r.differences.len()).sum(),
            results,
        };
        tracing::info!(
            cycle_number,
            is_new_cycle,
            players = report.players_processed,
            with_changes = report.players_with_changes,
            differences = report.total_differences,
            "comparison complete"
        );
        report
    }

    async fn baselines(
        &self,
        batch: &[ReportRecord],
        cycle_number: u32,
    ) -> HashMap<String, StoredSnapshot> {
        let mut players: Vec<String> = batch.iter().map(|r| r.player_id.clone()).collect();
        players.sort();
        players.dedup();

        match latest_snapshots(self.store.as_ref(), &players, cycle_number).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(%e, "grouped snapshot lookup failed, looking up players one by one");
                self.lookup_each(players, cycle_number).await
            }
        }
    }

    async fn lookup_each(
        &self,
        players: Vec<String>,
        cycle_number: u32,
    ) -> HashMap<String, StoredSnapshot> {
        let semaphore = Arc::new(Semaphore::new(self.lookup_concurrency));
        let mut set = JoinSet::new();
        for player_id in players {
            let store = Arc::clone(&self.store);
            let sem = Arc::clone(&semaphore);
            set.spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return (player_id, None);
                };
                match latest_snapshot(store.as_ref(), &player_id, cycle_number).await {
                    Ok(snapshot) => (player_id, snapshot),
                    Err(e) => {
                        tracing::warn!(
                            %player_id,
                            %e,
                            "snapshot lookup failed, treating as no stored data"
                        );
                        (player_id, None)
                    }
                }
            });
        }

        let mut found = HashMap::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((player_id, Some(snapshot))) => {
                    found.insert(player_id, snapshot);
                }
                Ok((_, None)) => {}
                Err(e) => tracing::warn!(%e, "snapshot lookup task failed"),
            }
        }
        found
    }
}

/// Diff one record against an optional baseline.
///
/// Without a baseline every present metric is a difference from 0 that needs
/// an update unless its value is 0. With a baseline a metric qualifies only
/// when it moved by more than `tolerance`; a metric missing from the
/// baseline counts as 0.
#[must_use]
pub fn diff_record(
    record: &ReportRecord,
    baseline: Option<&StoredSnapshot>,
    tolerance: f64,
) -> ComparisonResult {
    let differences: Vec<MetricDifference> = match baseline {
        None => record
            .present_metrics()
            .into_iter()
            .map(|(metric, new_value)| MetricDifference {
                player_id: record.player_id.clone(),
                metric,
                old_value: 0.0,
                new_value,
                delta: new_value,
                percent_change: if new_value > 0.0 { 100.0 } else { 0.0 },
                requires_update: new_value != 0.0,
            })
            .collect(),
        Some(snapshot) => record
            .present_metrics()
            .into_iter()
            .filter_map(|(metric, new_value)| {
                let old_value = snapshot.metric(metric).unwrap_or(0.0);
                let delta = new_value - old_value;
                (delta.abs() > tolerance).then(|| MetricDifference {
                    player_id: record.player_id.clone(),
                    metric,
                    old_value,
                    new_value,
                    delta,
                    percent_change: percent_change(old_value, new_value, delta),
                    requires_update: true,
                })
            })
            .collect(),
    };

    let has_changes = differences.iter().any(|d| d.requires_update);
    let summary = summarize(&differences, baseline.is_some());
    ComparisonResult {
        player_id: record.player_id.clone(),
        team: record.team,
        differences,
        has_changes,
        had_baseline: baseline.is_some(),
        summary,
    }
}

fn percent_change(old_value: f64, new_value: f64, delta: f64) -> f64 {
    if old_value > 0.0 {
        delta / old_value * 100.0
    } else if new_value > 0.0 {
        100.0
    } else {
        0.0
    }
}

fn summarize(differences: &[MetricDifference], had_baseline: bool) -> String {
    if differences.is_empty() {
        return String::from("no changes");
    }
    let metrics = differences
        .iter()
        .map(|d| format!("{} {:+.2}", d.metric, d.delta))
        .collect::<Vec<_>>()
        .join(", ");
    let origin = if had_baseline { "changed" } else { "from new baseline" };
    format!("{} metric(s) {origin}: {metrics}", differences.len())
}
