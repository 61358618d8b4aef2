use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use psync_core::entities::{GoalPercentages, StoredSnapshot};
use psync_core::enums::{Metric, SnapshotOrigin, TeamVariant, Trend};
use psync_history::{CycleAggregator, HistoryError};
use psync_store::{MemoryStore, SnapshotStore};
use psync_store::snapshots::insert_snapshot;
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

/// Cycle `n` starts on 2025-01-01 + 21·(n−1) days.
fn snapshot(
    cycle_number: u32,
    cycle_day: u32,
    upload_hour: i64,
    goals: (f64, f64, f64),
) -> StoredSnapshot {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        + chrono::Days::new(u64::from((cycle_number - 1) * 21));
    let report_day = start + chrono::Days::new(u64::from(cycle_day - 1));
    StoredSnapshot {
        player_id: "P1".into(),
        team: TeamVariant::Cs,
        cycle_number,
        uploaded_at: Utc
            .timestamp_opt(
                1_735_689_600 + i64::from(cycle_number) * 2_000_000 + upload_hour * 3600,
                0,
            )
            .unwrap(),
        report_date: report_day.format("%Y-%m-%d").to_string(),
        cycle_day,
        total_cycle_days: 21,
        metrics: BTreeMap::from([(Metric::Conversoes, goals.0)]),
        goals: GoalPercentages {
            primary: goals.0,
            secondary1: goals.1,
            secondary2: goals.2,
        },
        origin: SnapshotOrigin::Upload,
    }
}

async fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    let snapshots = [
        // Cycle 1 ends 2025-01-21, mean 55.
        snapshot(1, 5, 0, (20.0, 20.0, 20.0)),
        snapshot(1, 20, 1, (55.0, 50.0, 60.0)),
        // Cycle 2, mean 65, uploaded out of order.
        snapshot(2, 18, 2, (65.0, 65.0, 65.0)),
        snapshot(2, 3, 1, (10.0, 10.0, 10.0)),
        // Cycle 3, mean 82.5.
        snapshot(3, 21, 0, (82.5, 80.0, 85.0)),
        // Cycle 4, mean 85.
        snapshot(4, 21, 0, (85.0, 85.0, 85.0)),
        // Cycle 8 runs 2025-05-28 .. 2025-06-17: still open.
        snapshot(8, 4, 0, (30.0, 30.0, 30.0)),
    ];
    for snap in &snapshots {
        insert_snapshot(&store, snap).await.unwrap();
    }
    store
}

#[tokio::test]
async fn history_lists_completed_cycles_newest_first() {
    let aggregator = CycleAggregator::new(seeded().await).with_today(today());

    let history = aggregator.get_player_cycle_history("P1").await.unwrap();

    let cycles: Vec<u32> = history.iter().map(|data| data.cycle.cycle_number).collect();
    assert_eq!(cycles, vec![4, 3, 2, 1]);
    let first = &history[3];
    assert_eq!(first.upload_count, 2);
    assert!((first.final_goals.secondary1 - 50.0).abs() < f64::EPSILON);
    assert_eq!(first.cycle.start_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    assert_eq!(first.cycle.end_date, NaiveDate::from_ymd_opt(2025, 1, 21).unwrap());
    assert_eq!(first.final_metrics.get(&Metric::Conversoes), Some(&55.0));
}

#[tokio::test]
async fn details_order_the_timeline_by_upload() {
    let aggregator = CycleAggregator::new(seeded().await).with_today(today());

    let details = aggregator.get_cycle_details("P1", 2).await.unwrap();

    let days: Vec<(usize, u32)> = details
        .timeline
        .iter()
        .map(|point| (point.sequence, point.cycle_day))
        .collect();
    assert_eq!(days, vec![(1, 3), (2, 18)]);
    assert!((details.history.final_goals.primary - 65.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn retry_snapshots_update_the_final_state_but_are_not_uploads() {
    let store = seeded().await;
    let mut retried = snapshot(2, 18, 3, (65.0, 65.0, 65.0));
    retried.metrics.insert(Metric::Upa, 4.0);
    retried.origin = SnapshotOrigin::Retry;
    insert_snapshot(&store, &retried).await.unwrap();
    let aggregator = CycleAggregator::new(store).with_today(today());

    let details = aggregator.get_cycle_details("P1", 2).await.unwrap();

    let sequences: Vec<usize> = details.timeline.iter().map(|point| point.sequence).collect();
    assert_eq!(sequences, vec![1, 2]);
    assert_eq!(details.history.upload_count, 2);
    assert_eq!(details.history.final_metrics.get(&Metric::Upa), Some(&4.0));
}

#[tokio::test]
async fn details_include_open_cycles() {
    let aggregator = CycleAggregator::new(seeded().await).with_today(today());
    let details = aggregator.get_cycle_details("P1", 8).await.unwrap();
    assert!(!details.history.cycle.is_completed);
    assert_eq!(details.timeline.len(), 1);
}

#[tokio::test]
async fn summary_stats_detect_improvement() {
    let aggregator = CycleAggregator::new(seeded().await).with_today(today());

    let stats = aggregator.get_cycle_summary_stats("P1").await.unwrap();

    assert_eq!(stats.total_cycles, 4);
    assert_eq!(stats.trend, Trend::Improving);
    assert_eq!(stats.best_cycle, Some(4));
    assert_eq!(stats.worst_cycle, Some(1));
    assert!((stats.average_overall - 71.875).abs() < 1e-9);
}

#[tokio::test]
async fn compare_two_cycles() {
    let aggregator = CycleAggregator::new(seeded().await).with_today(today());

    let comparison = aggregator.compare_cycles("P1", 1, 4).await.unwrap();

    assert!((comparison.deltas.primary - 30.0).abs() < 1e-9);
    assert!((comparison.deltas.secondary1 - 35.0).abs() < 1e-9);
    assert!((comparison.deltas.secondary2 - 25.0).abs() < 1e-9);
    assert!((comparison.total_improvement - 30.0).abs() < 1e-9);
    assert_eq!(comparison.summary, "excellent improvement");
}

#[tokio::test]
async fn unknown_cycle_is_reported() {
    let aggregator = CycleAggregator::new(seeded().await).with_today(today());

    let err = aggregator.compare_cycles("P1", 1, 6).await.unwrap_err();
    assert!(matches!(err, HistoryError::CycleNotFound { cycle_number: 6, .. }));

    let err = aggregator.get_cycle_details("P2", 1).await.unwrap_err();
    assert!(matches!(err, HistoryError::CycleNotFound { .. }));
}

#[tokio::test]
async fn malformed_documents_are_skipped() {
    let store = seeded().await;
    store
        .insert(json!({"player_id": "P1", "cycle_number": 5, "uploaded_at": "yesterday"}))
        .await
        .unwrap();
    let aggregator = CycleAggregator::new(store).with_today(today());

    let history = aggregator.get_player_cycle_history("P1").await.unwrap();
    assert_eq!(history.len(), 4);
}

#[tokio::test]
async fn player_without_snapshots_has_stable_empty_stats() {
    let aggregator = CycleAggregator::new(MemoryStore::new()).with_today(today());
    let stats = aggregator.get_cycle_summary_stats("nobody").await.unwrap();
    assert_eq!(stats.total_cycles, 0);
    assert_eq!(stats.trend, Trend::Stable);
}

#[tokio::test]
async fn store_outage_is_an_error() {
    let store = seeded().await;
    store.set_unavailable(true);
    let aggregator = CycleAggregator::new(store).with_today(today());
    assert!(matches!(
        aggregator.get_player_cycle_history("P1").await,
        Err(HistoryError::Store(_))
    ));
}
