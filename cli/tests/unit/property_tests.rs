//! Property tests for the aggregator over arbitrary producer interleavings.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use push_cli::application::services::apply_streams::StreamAggregator;
use push_cli::application::streams::{ApplySender, apply_channel};
use push_cli::domain::{ApplyError, OperationError, ProgressEvent, render};

use crate::mocks::{RecordingUi, display_context};

/// One producer action; `Yield` lets the aggregator run in between.
#[derive(Debug, Clone)]
enum Action {
    Event(ProgressEvent),
    Warnings(Vec<String>),
    Yield,
}

fn non_terminal_event() -> impl Strategy<Value = ProgressEvent> {
    prop::sample::select(
        ProgressEvent::ALL
            .iter()
            .copied()
            .filter(|e| !e.is_terminal())
            .collect::<Vec<_>>(),
    )
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => non_terminal_event().prop_map(Action::Event),
        2 => prop::collection::vec("[a-z]{1,8}", 1..4).prop_map(Action::Warnings),
        2 => Just(Action::Yield),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

async fn perform(tx: &ApplySender, actions: &[Action]) {
    for action in actions {
        match action {
            Action::Event(e) => {
                tx.event(*e);
            }
            Action::Warnings(w) => {
                tx.warnings(w.clone());
            }
            Action::Yield => tokio::task::yield_now().await,
        }
    }
}

fn expected_texts(actions: &[Action]) -> Vec<String> {
    let ctx = display_context();
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Event(e) => render(*e, &ctx),
            _ => None,
        })
        .collect()
}

fn expected_batches(actions: &[Action]) -> Vec<Vec<String>> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Warnings(w) => Some(w.clone()),
            _ => None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every event renders in order and every batch is flushed whole, no
    /// matter how the producer interleaves sends and closures.
    #[test]
    fn prop_clean_runs_render_everything_in_order(
        actions in prop::collection::vec(action(), 0..24),
        close_warnings_first in any::<bool>(),
    ) {
        let ui = RecordingUi::default();
        let ctx = display_context();
        let (mut tx, streams) = apply_channel();

        let producer = async {
            perform(&tx, &actions).await;
            tx.event(ProgressEvent::Finished);
            if close_warnings_first {
                tx.close_warnings();
                tokio::task::yield_now().await;
                tx.close_events();
            } else {
                tx.close_events();
                tokio::task::yield_now().await;
                tx.close_warnings();
            }
            tx.close_errors();
        };

        let result = runtime().block_on(async {
            let aggregator = StreamAggregator::new(&ui, &ctx);
            let (result, ()) = tokio::join!(aggregator.run(streams), producer);
            result
        });

        prop_assert!(result.is_ok());
        prop_assert_eq!(ui.texts(), expected_texts(&actions));
        prop_assert_eq!(ui.warning_batches(), expected_batches(&actions));
    }

    /// An error anywhere in the run is returned as sent, and only output sent
    /// before the error is shown, in order.
    #[test]
    fn prop_error_runs_return_the_sent_error(
        actions in prop::collection::vec(action(), 0..24),
        split in any::<prop::sample::Index>(),
    ) {
        let ui = RecordingUi::default();
        let ctx = display_context();
        let (tx, streams) = apply_channel();
        let sent = OperationError::new(anyhow::anyhow!("injected"));
        let at = split.index(actions.len() + 1);
        let (before, after) = actions.split_at(at);

        let producer = async {
            perform(&tx, before).await;
            tx.error(sent.clone());
            perform(&tx, after).await;
        };

        let result = runtime().block_on(async {
            let aggregator = StreamAggregator::new(&ui, &ctx);
            let (result, ()) = tokio::join!(aggregator.run(streams), producer);
            result
        });

        match result {
            Err(ApplyError::Operation(received)) => prop_assert!(received.is_same(&sent)),
            other => prop_assert!(false, "expected operation error, got {:?}", other),
        }
        let shown = ui.texts();
        let sent_before = expected_texts(before);
        prop_assert!(shown.len() <= sent_before.len());
        prop_assert_eq!(&shown[..], &sent_before[..shown.len()]);

        let batches = ui.warning_batches();
        let batches_before = expected_batches(before);
        prop_assert!(batches.len() <= batches_before.len());
        prop_assert_eq!(&batches[..], &batches_before[..batches.len()]);
    }
}
