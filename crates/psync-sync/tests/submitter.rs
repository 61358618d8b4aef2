mod common;

use std::time::Duration;

use chrono::Utc;
use common::{ScriptedTransport, action_log, credentials, no_delays, unavailable};
use pretty_assertions::assert_eq;
use psync_core::entities::ActionLog;
use psync_core::enums::Metric;
use psync_sync::{BULK_REJECTED, BatchSubmitter, SubmitPhase, SubmitProgress};

fn logs(n: u32) -> Vec<ActionLog> {
    (0..n)
        .map(|i| action_log(&format!("P{i}"), Metric::Atividade, f64::from(i) + 1.0))
        .collect()
}

#[tokio::test]
async fn bulk_marks_first_n_registered_as_successful() {
    let submitter = BatchSubmitter::new(ScriptedTransport::default().bulk_returns(Ok(3)), no_delays());
    let mut seen = Vec::new();

    let result = submitter
        .submit_batch(&logs(5), &credentials(), &mut |p: SubmitProgress| seen.push(p))
        .await;

    assert_eq!(result.total, 5);
    assert_eq!(result.succeeded, 3);
    assert_eq!(result.failed, 2);
    let flags: Vec<bool> = result.results.iter().map(|item| item.success).collect();
    assert_eq!(flags, vec![true, true, true, false, false]);
    assert_eq!(result.results[4].error.as_deref(), Some(BULK_REJECTED));
    assert_eq!(submitter.transport().bulk_call_count(), 1);
    assert_eq!(seen.len(), 5);
    assert!(seen.iter().all(|p| p.phase == SubmitPhase::Bulk && p.total == 5));
}

#[tokio::test]
async fn bulk_wire_entries_carry_delta() {
    let submitter = BatchSubmitter::new(ScriptedTransport::default(), no_delays());
    let batch = vec![action_log("P1", Metric::Atividade, 85.5)];

    let result = submitter.submit_batch(&batch, &credentials(), &mut |_: SubmitProgress| {}).await;

    assert!(result.is_complete_success());
    let calls = submitter.transport().bulk_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0].action_id, "atividade");
    assert_eq!(calls[0][0].user_id, "P1");
    assert!((calls[0][0].attributes.value - 85.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn bulk_failure_falls_back_to_individual_in_order() {
    let transport = ScriptedTransport::default().bulk_returns(Err(unavailable()));
    let submitter = BatchSubmitter::new(transport, no_delays());
    let mut seen = Vec::new();

    let result = submitter
        .submit_batch(&logs(3), &credentials(), &mut |p: SubmitProgress| seen.push(p))
        .await;

    assert!(result.is_complete_success());
    let order: Vec<String> = submitter
        .transport()
        .single_calls
        .lock()
        .unwrap()
        .iter()
        .map(|entry| entry.user_id.clone())
        .collect();
    assert_eq!(order, vec!["P0", "P1", "P2"]);
    // One event per individual request, none for the failed bulk call.
    let expected: Vec<SubmitProgress> = (1..=3)
        .map(|completed| SubmitProgress {
            phase: SubmitPhase::Individual,
            completed,
            total: 3,
        })
        .collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn individual_submission_stops_after_three_attempts() {
    let transport = ScriptedTransport::default()
        .bulk_returns(Err(unavailable()))
        .always_fail_for("P1");
    let submitter = BatchSubmitter::new(transport, no_delays());

    let result = submitter.submit_batch(&logs(3), &credentials(), &mut |_: SubmitProgress| {}).await;

    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 1);
    let failed = &result.results[1];
    assert!(!failed.success);
    assert_eq!(failed.attempts, 3);
    assert!(failed.error.as_deref().unwrap().contains("503"));
    assert_eq!(submitter.transport().single_calls_for("P1"), 3);
    assert_eq!(result.summary, "2/3 action logs submitted (66.7% success), 1 failed");
}

#[tokio::test]
async fn transient_failure_succeeds_on_retry() {
    let transport = ScriptedTransport::default()
        .bulk_returns(Err(unavailable()))
        .single_returns(Err(unavailable()));
    let submitter = BatchSubmitter::new(transport, no_delays());

    let result = submitter.submit_batch(&logs(1), &credentials(), &mut |_: SubmitProgress| {}).await;

    assert!(result.is_complete_success());
    assert_eq!(result.results[0].attempts, 2);
}

#[tokio::test]
async fn invalid_logs_are_never_sent() {
    let mut batch = logs(2);
    batch[0].delta = f64::INFINITY;
    batch[1].timestamp = Utc::now() + chrono::Duration::days(1);
    batch.push(action_log("P9", Metric::Upa, 2.0));
    let submitter = BatchSubmitter::new(ScriptedTransport::default(), no_delays());

    let result = submitter.submit_batch(&batch, &credentials(), &mut |_: SubmitProgress| {}).await;

    assert_eq!(result.failed, 2);
    assert_eq!(result.results[0].attempts, 0);
    assert!(result.results[0].error.as_deref().unwrap().contains("finite"));
    assert!(result.results[1].error.as_deref().unwrap().contains("future"));
    assert!(result.results[2].success);
    let sent = submitter.transport().bulk_calls.lock().unwrap().clone();
    assert_eq!(sent[0].len(), 1);
    assert_eq!(sent[0][0].user_id, "P9");
}

#[tokio::test]
async fn empty_batch_makes_no_requests() {
    let submitter = BatchSubmitter::new(ScriptedTransport::default(), no_delays());
    let result = submitter.submit_batch(&[], &credentials(), &mut |_: SubmitProgress| {}).await;
    assert_eq!(result.total, 0);
    assert_eq!(submitter.transport().bulk_call_count(), 0);
}

#[tokio::test]
async fn retry_failed_resubmits_only_the_failed_subset() {
    let submitter = BatchSubmitter::new(ScriptedTransport::default().bulk_returns(Ok(2)), no_delays());
    let first = submitter.submit_batch(&logs(4), &credentials(), &mut |_: SubmitProgress| {}).await;
    assert_eq!(first.failed, 2);

    let retried = submitter.retry_failed(&first, &credentials(), &mut |_: SubmitProgress| {}).await;

    assert_eq!(retried.total, 2);
    assert!(retried.is_complete_success());
    let indices: Vec<usize> = retried.results.iter().map(|item| item.index).collect();
    assert_eq!(indices, vec![2, 3]);
    assert_eq!(submitter.transport().bulk_call_count(), 1);
    assert_eq!(submitter.transport().single_calls.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn backoff_grows_linearly() {
    let transport = ScriptedTransport::default()
        .bulk_returns(Err(unavailable()))
        .always_fail_for("P0");
    let settings = psync_sync::SubmitterSettings {
        max_attempts: 3,
        retry_base_delay: Duration::from_secs(1),
        inter_request_delay: Duration::ZERO,
    };
    let submitter = BatchSubmitter::new(transport, settings);

    let started = tokio::time::Instant::now();
    let result = submitter.submit_batch(&logs(1), &credentials(), &mut |_: SubmitProgress| {}).await;

    assert_eq!(result.results[0].attempts, 3);
    // 1s after the first attempt, 2s after the second, none after the last.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
}
