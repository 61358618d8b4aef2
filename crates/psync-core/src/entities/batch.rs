use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ActionLog;

/// Outcome of submitting one action log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ItemResult {
    /// Position in the submitted array.
    pub index: usize,
    pub action_log: ActionLog,
    pub success: bool,
    pub error: Option<String>,
    /// Requests made for this item (`0` when it never left the process).
    pub attempts: u32,
}

/// Tally of a batch submission. Failed items stay inspectable and retryable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<ItemResult>,
    pub summary: String,
}

impl BatchResult {
    /// Build a result from per-item outcomes, computing counts and summary.
    #[must_use]
    pub fn from_items(results: Vec<ItemResult>) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|item| item.success).count();
        let failed = total - succeeded;
        let summary = summarize(total, succeeded, failed);
        Self {
            total,
            succeeded,
            failed,
            results,
            summary,
        }
    }

    /// Action logs of the failed items, in submitted order.
    #[must_use]
    pub fn failed_logs(&self) -> Vec<ActionLog> {
        self.results
            .iter()
            .filter(|item| !item.success)
            .map(|item| item.action_log.clone())
            .collect()
    }

    #[must_use]
    pub const fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// Success rate in percent; an empty batch counts as fully successful.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.succeeded as f64 / self.total as f64 * 100.0
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(total: usize, succeeded: usize, failed: usize) -> String {
    if total == 0 {
        return String::from("no action logs to submit");
    }
    let rate = succeeded as f64 / total as f64 * 100.0;
    if failed == 0 {
        format!("all {total} action logs submitted successfully (100.0% success)")
    } else if succeeded == 0 {
        format!("all {total} action logs failed (0.0% success)")
    } else {
        format!("{succeeded}/{total} action logs submitted ({rate:.1}% success), {failed} failed")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entities::ActionAudit;
    use crate::enums::Metric;

    fn item(index: usize, success: bool) -> ItemResult {
        ItemResult {
            index,
            action_log: ActionLog {
                player_id: format!("P{index}"),
                action_id: "upa".into(),
                delta: 1.0,
                timestamp: Utc::now(),
                audit: ActionAudit {
                    metric: Metric::Upa,
                    previous_value: 0.0,
                    new_value: 1.0,
                    percent_change: 100.0,
                },
            },
            success,
            error: (!success).then(|| "boom".to_string()),
            attempts: 1,
        }
    }

    #[test]
    fn counts_and_summary() {
        let result = BatchResult::from_items(vec![item(0, true), item(1, false), item(2, true), item(3, true)]);
        assert_eq!(result.total, 4);
        assert_eq!(result.succeeded, 3);
        assert_eq!(result.failed, 1);
        assert!((result.success_rate() - 75.0).abs() < 1e-9);
        assert_eq!(result.summary, "3/4 action logs submitted (75.0% success), 1 failed");
        assert_eq!(result.failed_logs().len(), 1);
        assert_eq!(result.failed_logs()[0].player_id, "P1");
    }

    #[test]
    fn empty_batch_is_success() {
        let result = BatchResult::from_items(Vec::new());
        assert!(result.is_complete_success());
        assert_eq!(result.summary, "no action logs to submit");
    }

    #[test]
    fn all_failed_summary() {
        let result = BatchResult::from_items(vec![item(0, false)]);
        assert_eq!(result.summary, "all 1 action logs failed (0.0% success)");
    }
}
