//! # psync-store
//!
//! Access to the external collection service that holds stored snapshots.
//!
//! The service is consumed through three operations over one logical
//! collection (see [`SnapshotStore`]): `query`, `aggregate`, and `insert`.
//! Typed snapshot helpers live in [`snapshots`]. Two implementations ship:
//! - [`HttpStore`]: the remote collection API
//! - [`MemoryStore`]: an in-process collection that evaluates the same
//!   pipeline stages, for tests and offline runs

pub mod http;
pub mod memory;
pub mod pipeline;
pub mod snapshots;

mod error;
mod http_store;

pub use error::StoreError;
pub use http_store::HttpStore;
pub use memory::MemoryStore;
pub use pipeline::{Filter, SortKey, Stage};

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

/// Query/write contract of the collection service.
///
/// Implementations are injected into the comparator, the upload pipeline, and
/// the cycle aggregator; nothing reaches for a global store.
pub trait SnapshotStore: Send + Sync {
    /// Run an aggregation pipeline and return the resulting documents.
    fn aggregate(
        &self,
        stages: &[Stage],
    ) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send;

    /// Append one document to the collection.
    fn insert(&self, document: Value) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Documents matching `filter`, in storage order.
    fn query(&self, filter: &Filter) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send {
        let stages = [Stage::Match(filter.clone())];
        async move { self.aggregate(&stages).await }
    }
}

impl<T: SnapshotStore> SnapshotStore for Arc<T> {
    fn aggregate(
        &self,
        stages: &[Stage],
    ) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send {
        (**self).aggregate(stages)
    }

    fn insert(&self, document: Value) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).insert(document)
    }

    fn query(&self, filter: &Filter) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send {
        (**self).query(filter)
    }
}
