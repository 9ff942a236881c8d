//! Tests for the apply stream aggregator.
//!
//! Covers completion detection, error precedence, warning flushing and the
//! incomplete-run policies.

#![allow(clippy::expect_used)]

use std::time::Duration;

use push_cli::application::services::apply_streams::{IncompletePolicy, StreamAggregator};
use push_cli::application::streams::apply_channel;
use push_cli::domain::{ApplyError, OperationError, ProgressEvent};

use crate::mocks::{Call, RecordingUi, Step, display_context, play, successful_run, wait_for_calls};

const NEVER: Duration = Duration::from_millis(150);

fn expected_full_run_lines() -> Vec<String> {
    vec![
        "Creating app web in org acme / space dev as alice...".to_string(),
        "Creating routes...".to_string(),
        "Binding routes...".to_string(),
        "Uploading application...".to_string(),
        "Upload complete".to_string(),
    ]
}

// ── Success ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_run_succeeds_with_five_lines() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();
    play(&mut tx, &successful_run());

    StreamAggregator::new(&ui, &ctx)
        .run(streams)
        .await
        .expect("run succeeds");

    assert_eq!(ui.texts(), expected_full_run_lines());
    assert!(ui.warning_batches().is_empty());
}

#[tokio::test]
async fn test_error_stream_closing_first_does_not_end_run() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();
    tx.close_errors();

    let aggregator = StreamAggregator::new(&ui, &ctx);
    let run = aggregator.run(streams);
    tokio::pin!(run);
    assert!(
        tokio::time::timeout(NEVER, &mut run).await.is_err(),
        "closing the error stream alone must not finish the run"
    );

    play(&mut tx, &successful_run());
    run.await.expect("run succeeds");
    assert_eq!(ui.texts().len(), 5);
}

#[tokio::test]
async fn test_success_tolerates_any_closure_order() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();
    play(
        &mut tx,
        &[
            Step::CloseWarnings,
            Step::Event(ProgressEvent::Updated),
            Step::Event(ProgressEvent::Finished),
            Step::CloseEvents,
        ],
    );

    // Error stream stays open: success does not wait for it.
    StreamAggregator::new(&ui, &ctx)
        .run(streams)
        .await
        .expect("run succeeds");
    assert_eq!(
        ui.texts(),
        vec!["Updating app web in org acme / space dev as alice...".to_string()]
    );
    drop(tx);
}

#[tokio::test]
async fn test_warning_after_finished_is_still_flushed() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();

    let aggregator = StreamAggregator::new(&ui, &ctx);
    let run = aggregator.run(streams);
    tokio::pin!(run);

    play(
        &mut tx,
        &[
            Step::Event(ProgressEvent::Created),
            Step::Event(ProgressEvent::Finished),
            Step::Warnings(vec!["disk quota near limit".to_string()]),
            Step::CloseWarnings,
            Step::CloseErrors,
        ],
    );
    assert!(
        tokio::time::timeout(NEVER, &mut run).await.is_err(),
        "run must not succeed while the event stream is open"
    );
    assert_eq!(
        ui.warning_batches(),
        vec![vec!["disk quota near limit".to_string()]]
    );

    tx.close_events();
    run.await.expect("run succeeds once events close");
}

#[tokio::test]
async fn test_warning_batches_keep_order_and_boundaries() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();
    play(
        &mut tx,
        &[
            Step::Warnings(vec!["a1".to_string(), "a2".to_string()]),
            Step::Event(ProgressEvent::UploadStarted),
            Step::Warnings(vec!["b1".to_string()]),
            Step::Event(ProgressEvent::Finished),
            Step::CloseEvents,
            Step::CloseWarnings,
        ],
    );

    StreamAggregator::new(&ui, &ctx)
        .run(streams)
        .await
        .expect("run succeeds");
    assert_eq!(
        ui.warning_batches(),
        vec![
            vec!["a1".to_string(), "a2".to_string()],
            vec!["b1".to_string()]
        ]
    );
}

#[tokio::test]
async fn test_later_warnings_do_not_jump_ahead_of_queued_events() {
    let ctx = display_context();
    let mut warning_first_every_time = true;

    for _ in 0..32 {
        let ui = RecordingUi::default();
        let (mut tx, streams) = apply_channel();
        play(
            &mut tx,
            &[
                Step::Event(ProgressEvent::Created),
                Step::Event(ProgressEvent::UploadStarted),
                Step::Event(ProgressEvent::UploadCompleted),
                Step::Warnings(vec!["disk quota near limit".to_string()]),
                Step::Event(ProgressEvent::Finished),
                Step::CloseEvents,
                Step::CloseWarnings,
                Step::CloseErrors,
            ],
        );
        StreamAggregator::new(&ui, &ctx)
            .run(streams)
            .await
            .expect("run succeeds");

        let calls = ui.calls();
        assert_eq!(calls.len(), 4);
        if matches!(calls[0], Call::Text(_)) {
            warning_first_every_time = false;
        }
    }

    assert!(
        !warning_first_every_time,
        "a warning batch sent after three events rendered first in every run"
    );
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_after_first_event_stops_rendering() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (tx, streams) = apply_channel();
    let sent = OperationError::new(anyhow::anyhow!("app staging failed"));

    let aggregator = StreamAggregator::new(&ui, &ctx);
    let producer = async {
        tx.event(ProgressEvent::Created);
        wait_for_calls(&ui, 1).await;
        tx.error(sent.clone());
        tx.event(ProgressEvent::RouteCreated);
        tx.warnings(vec!["ignored".to_string()]);
    };
    let (result, ()) = tokio::join!(aggregator.run(streams), producer);

    let Err(ApplyError::Operation(received)) = result else {
        panic!("expected operation error, got {result:?}");
    };
    assert!(received.is_same(&sent), "error must be passed through unchanged");
    assert_eq!(
        ui.calls(),
        vec![Call::Text(
            "Creating app web in org acme / space dev as alice...".to_string()
        )]
    );
}

#[tokio::test]
async fn test_error_wins_over_simultaneously_ready_items() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();
    play(
        &mut tx,
        &[
            Step::Event(ProgressEvent::Created),
            Step::Warnings(vec!["w".to_string()]),
            Step::Error(OperationError::new(anyhow::anyhow!("boom"))),
        ],
    );

    let result = StreamAggregator::new(&ui, &ctx).run(streams).await;
    assert!(matches!(result, Err(ApplyError::Operation(_))));
    assert!(ui.calls().is_empty(), "nothing renders once an error is ready");
}

#[tokio::test]
async fn test_error_returns_without_waiting_for_open_streams() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (tx, streams) = apply_channel();
    tx.error(OperationError::new(anyhow::anyhow!("route taken")));

    let result = tokio::time::timeout(NEVER, StreamAggregator::new(&ui, &ctx).run(streams))
        .await
        .expect("run returns promptly");
    assert_eq!(result.expect_err("error").to_string(), "route taken");
    assert!(!tx.is_listening(), "streams are dropped on return");
}

// ── Incomplete runs ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_closed_without_finished_waits_forever() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();
    play(
        &mut tx,
        &[
            Step::Event(ProgressEvent::Created),
            Step::CloseEvents,
            Step::CloseWarnings,
            Step::CloseErrors,
        ],
    );

    let outcome = tokio::time::timeout(NEVER, StreamAggregator::new(&ui, &ctx).run(streams)).await;
    assert!(outcome.is_err(), "run must not return");
    assert_eq!(ui.texts().len(), 1);
}

#[tokio::test]
async fn test_events_closed_without_finished_fails_under_fail_policy() {
    let ui = RecordingUi::default();
    let ctx = display_context();
    let (mut tx, streams) = apply_channel();
    play(
        &mut tx,
        &[Step::Event(ProgressEvent::Created), Step::CloseEvents],
    );

    let result = StreamAggregator::new(&ui, &ctx)
        .with_policy(IncompletePolicy::Fail)
        .run(streams)
        .await;
    let Err(ApplyError::Incomplete { app }) = result else {
        panic!("expected incomplete, got {result:?}");
    };
    assert_eq!(app, "web");
}

#[tokio::test]
async fn test_missing_context_skips_app_line_but_run_succeeds() {
    let ui = RecordingUi::default();
    let ctx = push_cli::domain::DisplayContext::default();
    let (mut tx, streams) = apply_channel();
    play(&mut tx, &successful_run());

    StreamAggregator::new(&ui, &ctx)
        .run(streams)
        .await
        .expect("run succeeds");
    assert_eq!(ui.texts(), expected_full_run_lines()[1..].to_vec());
}
