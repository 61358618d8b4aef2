//! Pre-submission checks on action logs.
//!
//! Problems are reported as messages, never as errors: the submitter turns
//! them into failed items and keeps going.

use chrono::{DateTime, Utc};
use psync_core::entities::ActionLog;

/// Problems with a single action log, empty when it can be sent.
#[must_use]
pub fn validate_action_log(log: &ActionLog, now: DateTime<Utc>) -> Vec<String> {
    let mut problems = Vec::new();
    if log.player_id.trim().is_empty() {
        problems.push(String::from("missing player id"));
    }
    if log.action_id.trim().is_empty() {
        problems.push(String::from("missing action id"));
    }
    if !log.delta.is_finite() {
        problems.push(format!("value is not a finite number ({})", log.delta));
    }
    if log.timestamp > now {
        problems.push(format!("timestamp {} is in the future", log.timestamp.to_rfc3339()));
    }
    problems
}

/// Problems across a batch, each prefixed with the item's position.
#[must_use]
pub fn validate_batch(logs: &[ActionLog], now: DateTime<Utc>) -> Vec<String> {
    logs.iter()
        .enumerate()
        .flat_map(|(index, log)| {
            validate_action_log(log, now)
                .into_iter()
                .map(move |problem| format!("action log {index} ({}): {problem}", log.player_id))
        })
        .collect()
}
