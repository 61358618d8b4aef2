//! In-process collection that evaluates the pipeline stages of [`crate::pipeline`].
//!
//! Clones share the same documents. Outages can be simulated for the whole
//! store or for requests that match a given player.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::pipeline::{Filter, SortKey, Stage};
use crate::{SnapshotStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    documents: Vec<Value>,
    unavailable: bool,
    reject_inserts: bool,
    failing_players: HashSet<String>,
    aggregate_calls: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_documents(documents: Vec<Value>) -> Self {
        let store = Self::new();
        store.lock().documents = documents;
        store
    }

    /// Snapshot of every stored document, in insertion order.
    #[must_use]
    pub fn documents(&self) -> Vec<Value> {
        self.lock().documents.clone()
    }

    /// Make every aggregate and insert fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Make inserts fail while reads keep working.
    pub fn set_reject_inserts(&self, reject: bool) {
        self.lock().reject_inserts = reject;
    }

    /// Fail any aggregate whose `$match` selects this player.
    pub fn fail_for_player(&self, player_id: &str) {
        self.lock().failing_players.insert(player_id.to_string());
    }

    #[must_use]
    pub fn aggregate_calls(&self) -> usize {
        self.lock().aggregate_calls
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemoryStore {
    async fn aggregate(&self, stages: &[Stage]) -> Result<Vec<Value>, StoreError> {
        let documents = {
            let mut inner = self.lock();
            inner.aggregate_calls += 1;
            if inner.unavailable {
                return Err(StoreError::Unavailable(String::from("memory store offline")));
            }
            if let Some(player) = stages
                .iter()
                .find_map(|stage| selected_failing_player(stage, &inner.failing_players))
            {
                return Err(StoreError::Unavailable(format!("lookup failed for {player}")));
            }
            inner.documents.clone()
        };

        stages.iter().try_fold(documents, apply_stage)
    }

    async fn insert(&self, document: Value) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.unavailable || inner.reject_inserts {
            return Err(StoreError::Unavailable(String::from("memory store rejected insert")));
        }
        if !document.is_object() {
            return Err(StoreError::Parse(String::from("document must be an object")));
        }
        inner.documents.push(document);
        Ok(())
    }
}

fn selected_failing_player(stage: &Stage, failing: &HashSet<String>) -> Option<String> {
    let Stage::Match(filter) = stage else {
        return None;
    };
    let predicate = filter.get("player_id")?;
    let candidates: Vec<&Value> = match predicate.get("$in") {
        Some(Value::Array(values)) => values.iter().collect(),
        _ => vec![predicate],
    };
    candidates
        .into_iter()
        .filter_map(Value::as_str)
        .find(|player| failing.contains(*player))
        .map(str::to_string)
}

fn apply_stage(documents: Vec<Value>, stage: &Stage) -> Result<Vec<Value>, StoreError> {
    match stage {
        Stage::Match(filter) => Ok(documents
            .into_iter()
            .filter(|doc| matches_filter(doc, filter))
            .collect()),
        Stage::Sort(key) => {
            let mut documents = documents;
            documents.sort_by(|a, b| compare_by(a, b, key));
            Ok(documents)
        }
        Stage::GroupFirst { by, into } => {
            let mut groups: Vec<(Value, Value)> = Vec::new();
            for doc in documents {
                let key = doc.get(by).cloned().unwrap_or(Value::Null);
                if !groups.iter().any(|(existing, _)| values_equal(existing, &key)) {
                    groups.push((key, doc));
                }
            }
            Ok(groups
                .into_iter()
                .map(|(key, doc)| {
                    let mut grouped = Map::new();
                    grouped.insert("_id".into(), key);
                    grouped.insert(into.clone(), doc);
                    Value::Object(grouped)
                })
                .collect())
        }
        Stage::Limit(n) => Ok(documents.into_iter().take(*n).collect()),
        Stage::Project(fields) => Ok(documents
            .into_iter()
            .map(|doc| {
                let projected: Map<String, Value> = fields
                    .iter()
                    .filter_map(|field| doc.get(field).map(|v| (field.clone(), v.clone())))
                    .collect();
                Value::Object(projected)
            })
            .collect()),
        Stage::ReplaceRoot(field) => documents
            .into_iter()
            .map(|doc| match doc.get(field) {
                Some(root @ Value::Object(_)) => Ok(root.clone()),
                _ => Err(StoreError::Parse(format!(
                    "replaceRoot: '{field}' is not a document"
                ))),
            })
            .collect(),
    }
}

fn matches_filter(doc: &Value, filter: &Filter) -> bool {
    filter.iter().all(|(field, predicate)| {
        let value = doc.get(field).unwrap_or(&Value::Null);
        match predicate.get("$in") {
            Some(Value::Array(options)) => options.iter().any(|option| values_equal(option, value)),
            _ => values_equal(predicate, value),
        }
    })
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a == b,
    }
}

fn compare_by(a: &Value, b: &Value, key: &SortKey) -> Ordering {
    let ordering = compare_values(a.get(&key.field), b.get(&key.field));
    if key.descending {
        ordering.reverse()
    } else {
        ordering
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64(), a.as_str(), b.as_str()) {
            (Some(x), Some(y), _, _) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (_, _, Some(x), Some(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::pipeline::{filter, one_of};

    fn store() -> MemoryStore {
        MemoryStore::with_documents(vec![
            json!({"player_id": "P1", "cycle_number": 1, "uploaded_at": 10}),
            json!({"player_id": "P1", "cycle_number": 1, "uploaded_at": 30}),
            json!({"player_id": "P2", "cycle_number": 1, "uploaded_at": 20}),
            json!({"player_id": "P1", "cycle_number": 2, "uploaded_at": 40}),
        ])
    }

    #[tokio::test]
    async fn match_sort_limit() {
        let docs = store()
            .aggregate(&[
                Stage::Match(filter([("player_id", json!("P1")), ("cycle_number", json!(1))])),
                Stage::Sort(SortKey::desc("uploaded_at")),
                Stage::Limit(1),
            ])
            .await
            .unwrap();
        assert_eq!(docs, vec![json!({"player_id": "P1", "cycle_number": 1, "uploaded_at": 30})]);
    }

    #[tokio::test]
    async fn group_first_and_replace_root() {
        let docs = store()
            .aggregate(&[
                Stage::Match(filter([("player_id", one_of(["P1", "P2"])), ("cycle_number", json!(1))])),
                Stage::Sort(SortKey::desc("uploaded_at")),
                Stage::GroupFirst {
                    by: "player_id".into(),
                    into: "latest".into(),
                },
                Stage::ReplaceRoot("latest".into()),
                Stage::Project(vec!["player_id".into(), "uploaded_at".into()]),
            ])
            .await
            .unwrap();
        assert_eq!(
            docs,
            vec![
                json!({"player_id": "P1", "uploaded_at": 30}),
                json!({"player_id": "P2", "uploaded_at": 20}),
            ]
        );
    }

    #[tokio::test]
    async fn query_is_a_match() {
        let docs = store()
            .query(&filter([("cycle_number", json!(2))]))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn failing_player_fails_batch_and_single_lookups() {
        let store = store();
        store.fail_for_player("P2");

        let batch = store
            .aggregate(&[Stage::Match(filter([("player_id", one_of(["P1", "P2"]))]))])
            .await;
        assert!(matches!(batch, Err(StoreError::Unavailable(_))));

        let single = store
            .aggregate(&[Stage::Match(filter([("player_id", json!("P1"))]))])
            .await;
        assert_eq!(single.unwrap().len(), 3);
        assert_eq!(store.aggregate_calls(), 2);
    }

    #[tokio::test]
    async fn insert_and_outage() {
        let store = MemoryStore::new();
        store.insert(json!({"player_id": "P9"})).await.unwrap();
        assert_eq!(store.documents().len(), 1);

        store.set_unavailable(true);
        assert!(store.insert(json!({"player_id": "P9"})).await.is_err());
        assert!(store.aggregate(&[]).await.is_err());
    }

    #[tokio::test]
    async fn replace_root_requires_document() {
        let err = store()
            .aggregate(&[Stage::ReplaceRoot("player_id".into())])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
