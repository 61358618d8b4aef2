//! Per-player cycle history built from stored snapshots.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use psync_core::entities::{
    CycleComparison, CycleDetails, CycleHistoryData, CycleSummaryStats, ProgressDataPoint,
    StoredSnapshot,
};
use psync_store::SnapshotStore;
use psync_store::snapshots::player_snapshots;

use crate::HistoryError;
use crate::stats::{compare, cycle_info, summary_stats};

/// Reads a player's snapshots and rolls them up per cycle.
///
/// A cycle counts as completed once its end date is before "today", which
/// defaults to the current UTC date and can be pinned with [`Self::with_today`].
pub struct CycleAggregator<S> {
    store: S,
    today: Option<NaiveDate>,
}

impl<S: SnapshotStore> CycleAggregator<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store, today: None }
    }

    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Completed cycles, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Store`] if the snapshots cannot be read.
    pub async fn get_player_cycle_history(
        &self,
        player_id: &str,
    ) -> Result<Vec<CycleHistoryData>, HistoryError> {
        let mut history: Vec<CycleHistoryData> = self
            .all_cycles(player_id)
            .await?
            .into_values()
            .map(|(data, _)| data)
            .filter(|data| data.cycle.is_completed)
            .collect();
        history.sort_by(|a, b| b.cycle.cycle_number.cmp(&a.cycle.cycle_number));
        Ok(history)
    }

    /// Final state of one cycle and its upload timeline, completed or not.
    ///
    /// The timeline has one point per upload; snapshots written by a retry
    /// only move the final state.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::CycleNotFound`] if the player has no usable
    /// snapshot in that cycle.
    pub async fn get_cycle_details(
        &self,
        player_id: &str,
        cycle_number: u32,
    ) -> Result<CycleDetails, HistoryError> {
        let (history, snapshots) = self
            .all_cycles(player_id)
            .await?
            .remove(&cycle_number)
            .ok_or_else(|| not_found(player_id, cycle_number))?;

        let timeline = snapshots
            .into_iter()
            .filter(StoredSnapshot::is_upload)
            .enumerate()
            .map(|(i, snapshot)| ProgressDataPoint {
                sequence: i + 1,
                uploaded_at: snapshot.uploaded_at,
                report_date: snapshot.report_date,
                cycle_day: snapshot.cycle_day,
                goals: snapshot.goals,
            })
            .collect();
        Ok(CycleDetails { history, timeline })
    }

    /// Averages, best/worst cycle, and trend over completed cycles.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Store`] if the snapshots cannot be read.
    pub async fn get_cycle_summary_stats(
        &self,
        player_id: &str,
    ) -> Result<CycleSummaryStats, HistoryError> {
        let history = self.get_player_cycle_history(player_id).await?;
        Ok(summary_stats(&history))
    }

    /// Deltas from cycle `a` to cycle `b`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::CycleNotFound`] if either cycle has no snapshot.
    pub async fn compare_cycles(
        &self,
        player_id: &str,
        cycle_a: u32,
        cycle_b: u32,
    ) -> Result<CycleComparison, HistoryError> {
        let mut cycles = self.all_cycles(player_id).await?;
        let (a, _) = cycles
            .remove(&cycle_a)
            .ok_or_else(|| not_found(player_id, cycle_a))?;
        let b = if cycle_a == cycle_b {
            a.clone()
        } else {
            cycles
                .remove(&cycle_b)
                .ok_or_else(|| not_found(player_id, cycle_b))?
                .0
        };
        Ok(compare(&a, &b))
    }

    /// Every cycle with a usable snapshot, keyed by cycle number, with its
    /// snapshots ordered by upload time.
    async fn all_cycles(
        &self,
        player_id: &str,
    ) -> Result<BTreeMap<u32, (CycleHistoryData, Vec<StoredSnapshot>)>, HistoryError> {
        let mut by_cycle: BTreeMap<u32, Vec<StoredSnapshot>> = BTreeMap::new();
        for snapshot in player_snapshots(&self.store, player_id).await? {
            by_cycle.entry(snapshot.cycle_number).or_default().push(snapshot);
        }

        let today = self.today();
        Ok(by_cycle
            .into_iter()
            .filter_map(|(cycle_number, mut snapshots)| {
                snapshots.sort_by_key(|snapshot| snapshot.uploaded_at);
                let Some(data) = history_data(&snapshots, today) else {
                    tracing::warn!(
                        player_id,
                        cycle_number,
                        "no snapshot with a readable report date, skipping cycle"
                    );
                    return None;
                };
                Some((cycle_number, (data, snapshots)))
            })
            .collect())
    }
}

/// Roll up one cycle's snapshots (ordered by upload time).
fn history_data(snapshots: &[StoredSnapshot], today: NaiveDate) -> Option<CycleHistoryData> {
    let last = snapshots.last()?;
    let cycle = snapshots
        .iter()
        .rev()
        .find_map(|snapshot| cycle_info(snapshot, today))?;
    Some(CycleHistoryData {
        cycle,
        team: last.team,
        final_goals: last.goals,
        final_metrics: last.metrics.clone(),
        upload_count: snapshots.iter().filter(|snapshot| snapshot.is_upload()).count(),
    })
}

fn not_found(player_id: &str, cycle_number: u32) -> HistoryError {
    HistoryError::CycleNotFound {
        player_id: player_id.to_string(),
        cycle_number,
    }
}
