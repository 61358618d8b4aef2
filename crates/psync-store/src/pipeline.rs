//! Aggregation pipeline model.
//!
//! A small fixed set of stages, serialized in the collection service's
//! `$stage` document format:
//!
//! | stage          | wire form                                            |
//! |----------------|------------------------------------------------------|
//! | `Match`        | `{"$match": {field: value \| {"$in": [...]}}}`        |
//! | `Sort`         | `{"$sort": {field: 1 \| -1}}`                         |
//! | `GroupFirst`   | `{"$group": {"_id": "$by", into: {"$first": "$$ROOT"}}}` |
//! | `Limit`        | `{"$limit": n}`                                      |
//! | `Project`      | `{"$project": {field: 1, ...}}`                      |
//! | `ReplaceRoot`  | `{"$replaceRoot": {"newRoot": "$field"}}`            |

use serde_json::{Map, Value, json};

/// Field predicates. A plain value means equality; `{"$in": [...]}` means membership.
pub type Filter = Map<String, Value>;

/// Build an equality filter from field/value pairs.
#[must_use]
pub fn filter<I, K>(pairs: I) -> Filter
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Membership predicate for a [`Filter`] entry.
#[must_use]
pub fn one_of<I, T>(values: I) -> Value
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    json!({ "$in": values.into_iter().map(Into::into).collect::<Vec<Value>>() })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    /// Single key: JSON objects do not keep key order, so compound sorts are
    /// done by the caller after fetching.
    Sort(SortKey),
    /// Keep the first document per distinct value of `by`, nested under `into`.
    GroupFirst { by: String, into: String },
    Limit(usize),
    Project(Vec<String>),
    /// Promote the sub-document at `field` to the root.
    ReplaceRoot(String),
}

impl Stage {
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Match(filter) => json!({ "$match": filter }),
            Self::Sort(key) => {
                let mut order = Map::new();
                order.insert(key.field.clone(), json!(if key.descending { -1 } else { 1 }));
                json!({ "$sort": order })
            }
            Self::GroupFirst { by, into } => {
                let mut group = Map::new();
                group.insert("_id".into(), json!(format!("${by}")));
                group.insert(into.clone(), json!({ "$first": "$$ROOT" }));
                json!({ "$group": group })
            }
            Self::Limit(n) => json!({ "$limit": n }),
            Self::Project(fields) => {
                let fields: Map<String, Value> =
                    fields.iter().map(|field| (field.clone(), json!(1))).collect();
                json!({ "$project": fields })
            }
            Self::ReplaceRoot(field) => json!({ "$replaceRoot": { "newRoot": format!("${field}") } }),
        }
    }
}

/// Serialize a whole pipeline as the request body array.
#[must_use]
pub fn pipeline_json(stages: &[Stage]) -> Value {
    Value::Array(stages.iter().map(Stage::to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_every_stage() {
        let stages = vec![
            Stage::Match(filter([
                ("player_id", one_of(["P1", "P2"])),
                ("cycle_number", json!(4)),
            ])),
            Stage::Sort(SortKey::desc("uploaded_at")),
            Stage::GroupFirst {
                by: "player_id".into(),
                into: "latest".into(),
            },
            Stage::ReplaceRoot("latest".into()),
            Stage::Project(vec!["player_id".into()]),
            Stage::Limit(10),
        ];

        assert_eq!(
            pipeline_json(&stages),
            json!([
                {"$match": {"player_id": {"$in": ["P1", "P2"]}, "cycle_number": 4}},
                {"$sort": {"uploaded_at": -1}},
                {"$group": {"_id": "$player_id", "latest": {"$first": "$$ROOT"}}},
                {"$replaceRoot": {"newRoot": "$latest"}},
                {"$project": {"player_id": 1}},
                {"$limit": 10}
            ])
        );
    }
}
