//! Batch submission of action logs with individual fallback and retries.
//!
//! Two stages:
//! 1. [`BatchSubmitter::attempt_bulk`] sends everything in one request and
//!    accounts for it, or fails as a whole.
//! 2. [`BatchSubmitter::submit_individually`] sends a work list one item at a
//!    time with retries. It handles both the bulk fallback and
//!    [`BatchSubmitter::retry_failed`].

use std::time::Duration;

use chrono::Utc;
use psync_config::SyncConfig;
use psync_core::entities::{ActionLog, ActionLogEntry, BatchResult, ItemResult};

use crate::PlatformError;
use crate::transport::{Credentials, PlatformTransport};
use crate::validation::validate_action_log;

/// Reason recorded for items past the bulk call's registered count.
pub const BULK_REJECTED: &str = "failed in bulk submission";

/// An action log waiting to be sent, with its position in the submitted array.
pub type PendingItem = (usize, ActionLog);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitterSettings {
    /// Attempts per individual submission, including the first.
    pub max_attempts: u32,
    /// Attempt `n` waits `n × retry_base_delay` before the next one.
    pub retry_base_delay: Duration,
    /// Pause between individual submissions.
    pub inter_request_delay: Duration,
}

impl From<&SyncConfig> for SubmitterSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
        }
    }
}

impl Default for SubmitterSettings {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Bulk,
    Individual,
}

/// Reported after each unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitProgress {
    pub phase: SubmitPhase,
    pub completed: usize,
    pub total: usize,
}

pub struct BatchSubmitter<T> {
    transport: T,
    settings: SubmitterSettings,
}

impl<T: PlatformTransport> BatchSubmitter<T> {
    #[must_use]
    pub const fn new(transport: T, settings: SubmitterSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Submit a batch: one bulk call, falling back to individual submissions
    /// if the bulk call fails.
    ///
    /// Invalid action logs are never sent; they come back as failed items with
    /// zero attempts. Per-item results are in submitted order.
    pub async fn submit_batch<F>(
        &self,
        logs: &[ActionLog],
        credentials: &Credentials,
        progress: &mut F,
    ) -> BatchResult
    where
        F: FnMut(SubmitProgress) + Send,
    {
        let (mut results, pending) = partition_valid(logs.iter().cloned().enumerate());
        if pending.is_empty() {
            return finish(results);
        }

        match self.attempt_bulk(&pending, credentials).await {
            Ok(items) => {
                let total = items.len();
                for completed in 1..=total {
                    progress(SubmitProgress {
                        phase: SubmitPhase::Bulk,
                        completed,
                        total,
                    });
                }
                results.extend(items);
            }
            Err(e) => {
                tracing::warn!(%e, items = pending.len(), "bulk submission failed, submitting individually");
                results.extend(self.submit_individually(pending, credentials, progress).await);
            }
        }
        finish(results)
    }

    /// One bulk request for every pending item.
    ///
    /// With `N` entries registered, the first `N` items in submitted order
    /// succeed and the rest fail with [`BULK_REJECTED`].
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the bulk call itself fails.
    pub async fn attempt_bulk(
        &self,
        pending: &[PendingItem],
        credentials: &Credentials,
    ) -> Result<Vec<ItemResult>, PlatformError> {
        let entries: Vec<ActionLogEntry> = pending.iter().map(|(_, log)| log.into()).collect();
        let registered = self.transport.submit_bulk(&entries, credentials).await?;
        if registered > pending.len() {
            tracing::debug!(
                registered,
                submitted = pending.len(),
                "platform registered more entries than submitted"
            );
        }
        tracing::info!(registered, submitted = pending.len(), "bulk submission accepted");

        Ok(pending
            .iter()
            .enumerate()
            .map(|(position, (index, log))| {
                let success = position < registered;
                ItemResult {
                    index: *index,
                    action_log: log.clone(),
                    success,
                    error: (!success).then(|| BULK_REJECTED.to_string()),
                    attempts: 1,
                }
            })
            .collect())
    }

    /// Send each item on its own, in order, pausing between items and
    /// retrying each up to the configured attempt budget.
    pub async fn submit_individually<F>(
        &self,
        pending: Vec<PendingItem>,
        credentials: &Credentials,
        progress: &mut F,
    ) -> Vec<ItemResult>
    where
        F: FnMut(SubmitProgress) + Send,
    {
        let total = pending.len();
        let mut results = Vec::with_capacity(total);
        for (position, (index, log)) in pending.into_iter().enumerate() {
            if position > 0 {
                tokio::time::sleep(self.settings.inter_request_delay).await;
            }
            let (success, error, attempts) = self.submit_with_retry(&log, credentials).await;
            results.push(ItemResult {
                index,
                action_log: log,
                success,
                error,
                attempts,
            });
            progress(SubmitProgress {
                phase: SubmitPhase::Individual,
                completed: position + 1,
                total,
            });
        }
        results
    }

    /// Re-submit the failed items of an earlier result through the individual
    /// path. The returned result covers only those items, under their
    /// original indices.
    pub async fn retry_failed<F>(
        &self,
        previous: &BatchResult,
        credentials: &Credentials,
        progress: &mut F,
    ) -> BatchResult
    where
        F: FnMut(SubmitProgress) + Send,
    {
        let (mut results, pending) = partition_valid(residual(previous));
        tracing::info!(retrying = pending.len(), "retrying failed action logs");
        results.extend(self.submit_individually(pending, credentials, progress).await);
        finish(results)
    }

    async fn submit_with_retry(
        &self,
        log: &ActionLog,
        credentials: &Credentials,
    ) -> (bool, Option<String>, u32) {
        let entry = ActionLogEntry::from(log);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut last_error = String::new();
        for attempt in 1..=max_attempts {
            match self.transport.submit_one(&entry, credentials).await {
                Ok(()) => return (true, None, attempt),
                Err(e) => {
                    tracing::warn!(
                        player_id = %log.player_id,
                        action_id = %log.action_id,
                        attempt,
                        max_attempts,
                        %e,
                        "action log submission failed"
                    );
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        tokio::time::sleep(self.settings.retry_base_delay * attempt).await;
                    }
                }
            }
        }
        (false, Some(last_error), max_attempts)
    }
}

/// Failed items of a result, keeping their original indices.
#[must_use]
pub fn residual(result: &BatchResult) -> Vec<PendingItem> {
    result
        .results
        .iter()
        .filter(|item| !item.success)
        .map(|item| (item.index, item.action_log.clone()))
        .collect()
}

/// Split items into failed results for invalid logs and the sendable rest.
fn partition_valid(items: impl IntoIterator<Item = PendingItem>) -> (Vec<ItemResult>, Vec<PendingItem>) {
    let now = Utc::now();
    let mut rejected = Vec::new();
    let mut pending = Vec::new();
    for (index, log) in items {
        let problems = validate_action_log(&log, now);
        if problems.is_empty() {
            pending.push((index, log));
        } else {
            tracing::warn!(index, player_id = %log.player_id, problems = ?problems, "invalid action log not submitted");
            rejected.push(ItemResult {
                index,
                action_log: log,
                success: false,
                error: Some(problems.join("; ")),
                attempts: 0,
            });
        }
    }
    (rejected, pending)
}

fn finish(mut results: Vec<ItemResult>) -> BatchResult {
    results.sort_by_key(|item| item.index);
    let batch = BatchResult::from_items(results);
    tracing::info!(
        total = batch.total,
        succeeded = batch.succeeded,
        failed = batch.failed,
        "{}",
        batch.summary
    );
    batch
}
