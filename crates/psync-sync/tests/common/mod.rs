#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use chrono::Utc;
use psync_core::entities::{ActionAudit, ActionLog, ActionLogEntry};
use psync_core::enums::Metric;
use psync_sync::{Credentials, PlatformError, PlatformTransport, SubmitterSettings};

/// Transport that replays scripted outcomes and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    bulk_outcomes: Mutex<VecDeque<Result<usize, PlatformError>>>,
    single_outcomes: Mutex<VecDeque<Result<(), PlatformError>>>,
    failing_users: Mutex<HashSet<String>>,
    pub bulk_calls: Mutex<Vec<Vec<ActionLogEntry>>>,
    pub single_calls: Mutex<Vec<ActionLogEntry>>,
}

impl ScriptedTransport {
    pub fn bulk_returns(self, outcome: Result<usize, PlatformError>) -> Self {
        self.bulk_outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn single_returns(self, outcome: Result<(), PlatformError>) -> Self {
        self.single_outcomes.lock().unwrap().push_back(outcome);
        self
    }

    /// Every single-item submission for this user fails.
    pub fn always_fail_for(self, user_id: &str) -> Self {
        self.failing_users.lock().unwrap().insert(user_id.to_string());
        self
    }

    pub fn bulk_call_count(&self) -> usize {
        self.bulk_calls.lock().unwrap().len()
    }

    pub fn single_calls_for(&self, user_id: &str) -> usize {
        self.single_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .count()
    }
}

pub fn unavailable() -> PlatformError {
    PlatformError::Api {
        status: 503,
        message: "service unavailable".into(),
    }
}

impl PlatformTransport for ScriptedTransport {
    async fn submit_bulk(
        &self,
        entries: &[ActionLogEntry],
        _credentials: &Credentials,
    ) -> Result<usize, PlatformError> {
        self.bulk_calls.lock().unwrap().push(entries.to_vec());
        let scripted = self.bulk_outcomes.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(entries.len()))
    }

    async fn submit_one(
        &self,
        entry: &ActionLogEntry,
        _credentials: &Credentials,
    ) -> Result<(), PlatformError> {
        self.single_calls.lock().unwrap().push(entry.clone());
        if self.failing_users.lock().unwrap().contains(&entry.user_id) {
            return Err(unavailable());
        }
        let scripted = self.single_outcomes.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(()))
    }
}

pub const fn no_delays() -> SubmitterSettings {
    SubmitterSettings {
        max_attempts: 3,
        retry_base_delay: std::time::Duration::ZERO,
        inter_request_delay: std::time::Duration::ZERO,
    }
}

pub fn credentials() -> Credentials {
    Credentials::bearer("test-token")
}

pub fn action_log(player_id: &str, metric: Metric, delta: f64) -> ActionLog {
    ActionLog {
        player_id: player_id.into(),
        action_id: metric.as_str().into(),
        delta,
        timestamp: Utc::now(),
        audit: ActionAudit {
            metric,
            previous_value: 0.0,
            new_value: delta,
            percent_change: 100.0,
        },
    }
}
