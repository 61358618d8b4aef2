//! Typed access to stored snapshots.
//!
//! Everything here is expressed through [`SnapshotStore`] so the same
//! queries run against the remote collection and [`crate::MemoryStore`].

use std::collections::HashMap;

use psync_core::entities::StoredSnapshot;
use serde_json::{Value, json};

use crate::pipeline::{SortKey, Stage, filter, one_of};
use crate::{SnapshotStore, StoreError};

/// Fields read back from stored snapshot documents.
pub const SNAPSHOT_FIELDS: [&str; 9] = [
    "player_id",
    "team",
    "cycle_number",
    "uploaded_at",
    "report_date",
    "cycle_day",
    "total_cycle_days",
    "metrics",
    "goals",
];

fn projection() -> Stage {
    Stage::Project(SNAPSHOT_FIELDS.iter().map(ToString::to_string).collect())
}

/// Decode one stored document.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] if the document is not a valid snapshot.
pub fn decode(document: Value) -> Result<StoredSnapshot, StoreError> {
    serde_json::from_value(document).map_err(|e| StoreError::Parse(e.to_string()))
}

/// Decode documents, dropping malformed ones with a warning.
fn decode_lenient(documents: Vec<Value>) -> Vec<StoredSnapshot> {
    documents
        .into_iter()
        .filter_map(|document| match decode(document) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed stored snapshot");
                None
            }
        })
        .collect()
}

/// Most recent snapshot of one player in one cycle.
///
/// # Errors
///
/// Returns the store's error, or [`StoreError::Parse`] for a malformed document.
pub async fn latest_snapshot<S: SnapshotStore>(
    store: &S,
    player_id: &str,
    cycle_number: u32,
) -> Result<Option<StoredSnapshot>, StoreError> {
    let stages = [
        Stage::Match(filter([
            ("player_id", json!(player_id)),
            ("cycle_number", json!(cycle_number)),
        ])),
        Stage::Sort(SortKey::desc("uploaded_at")),
        Stage::Limit(1),
        projection(),
    ];
    store
        .aggregate(&stages)
        .await?
        .into_iter()
        .next()
        .map(decode)
        .transpose()
}

/// Most recent snapshot per player for a set of players, in one request.
///
/// Players without a snapshot in the cycle are absent from the map.
///
/// # Errors
///
/// Returns the store's error. Malformed documents are skipped, not errors.
pub async fn latest_snapshots<S: SnapshotStore>(
    store: &S,
    player_ids: &[String],
    cycle_number: u32,
) -> Result<HashMap<String, StoredSnapshot>, StoreError> {
    if player_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let stages = [
        Stage::Match(filter([
            ("player_id", one_of(player_ids.iter().map(String::as_str))),
            ("cycle_number", json!(cycle_number)),
        ])),
        Stage::Sort(SortKey::desc("uploaded_at")),
        Stage::GroupFirst {
            by: "player_id".into(),
            into: "latest".into(),
        },
        Stage::ReplaceRoot("latest".into()),
        projection(),
    ];
    let documents = store.aggregate(&stages).await?;
    Ok(decode_lenient(documents)
        .into_iter()
        .map(|snapshot| (snapshot.player_id.clone(), snapshot))
        .collect())
}

/// Every snapshot of one player across all cycles, oldest upload first.
///
/// # Errors
///
/// Returns the store's error. Malformed documents are skipped, not errors.
pub async fn player_snapshots<S: SnapshotStore>(
    store: &S,
    player_id: &str,
) -> Result<Vec<StoredSnapshot>, StoreError> {
    let stages = [
        Stage::Match(filter([("player_id", json!(player_id))])),
        Stage::Sort(SortKey::asc("uploaded_at")),
        projection(),
    ];
    let documents = store.aggregate(&stages).await?;
    Ok(decode_lenient(documents))
}

/// Every snapshot stored for one cycle, in storage order.
///
/// # Errors
///
/// Returns the store's error. Malformed documents are skipped, not errors.
pub async fn cycle_snapshots<S: SnapshotStore>(
    store: &S,
    cycle_number: u32,
) -> Result<Vec<StoredSnapshot>, StoreError> {
    let documents = store
        .query(&filter([("cycle_number", json!(cycle_number))]))
        .await?;
    Ok(decode_lenient(documents))
}

/// Append a snapshot to the collection.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] if serialization fails, or the store's error.
pub async fn insert_snapshot<S: SnapshotStore>(
    store: &S,
    snapshot: &StoredSnapshot,
) -> Result<(), StoreError> {
    let document = serde_json::to_value(snapshot).map_err(|e| StoreError::Parse(e.to_string()))?;
    store.insert(document).await
}
