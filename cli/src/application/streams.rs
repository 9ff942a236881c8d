//! Channel plumbing between an apply producer and the stream aggregator.
//!
//! A producer holds an [`ApplySender`]; the aggregator consumes the matching
//! [`ApplyStreams`]. Each of the three streams closes independently: the
//! producer closes one early with the `close_*` methods, and dropping the
//! sender closes whatever is still open.

use tokio::sync::mpsc;

use crate::domain::{OperationError, ProgressEvent, Warnings};

/// Consumer side: three independently closable streams.
#[derive(Debug)]
pub struct ApplyStreams {
    pub events: mpsc::UnboundedReceiver<ProgressEvent>,
    pub warnings: mpsc::UnboundedReceiver<Warnings>,
    pub errors: mpsc::UnboundedReceiver<OperationError>,
}

/// Producer side of an apply run.
///
/// Sends never block. Once the aggregator has returned, sends report `false`
/// and the producer should stop working.
#[derive(Debug)]
pub struct ApplySender {
    events: Option<mpsc::UnboundedSender<ProgressEvent>>,
    warnings: Option<mpsc::UnboundedSender<Warnings>>,
    errors: Option<mpsc::UnboundedSender<OperationError>>,
}

/// Create a connected sender/streams pair.
#[must_use]
pub fn apply_channel() -> (ApplySender, ApplyStreams) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (warning_tx, warning_rx) = mpsc::unbounded_channel();
    let (error_tx, error_rx) = mpsc::unbounded_channel();
    (
        ApplySender {
            events: Some(event_tx),
            warnings: Some(warning_tx),
            errors: Some(error_tx),
        },
        ApplyStreams {
            events: event_rx,
            warnings: warning_rx,
            errors: error_rx,
        },
    )
}

impl ApplySender {
    /// Emit a progress event. Returns `false` if nobody is listening.
    pub fn event(&self, event: ProgressEvent) -> bool {
        send(self.events.as_ref(), event, "event")
    }

    /// Emit a batch of warnings. Empty batches are skipped.
    pub fn warnings(&self, warnings: Warnings) -> bool {
        if warnings.is_empty() {
            return self.is_listening();
        }
        send(self.warnings.as_ref(), warnings, "warnings")
    }

    /// Emit the fail-fast error.
    pub fn error(&self, err: OperationError) -> bool {
        send(self.errors.as_ref(), err, "error")
    }

    /// Close the event stream.
    pub fn close_events(&mut self) {
        self.events = None;
    }

    /// Close the warnings stream.
    pub fn close_warnings(&mut self) {
        self.warnings = None;
    }

    /// Close the error stream.
    pub fn close_errors(&mut self) {
        self.errors = None;
    }

    /// Returns `true` while the consumer still holds the streams.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.events.as_ref().is_some_and(|tx| !tx.is_closed())
            || self.warnings.as_ref().is_some_and(|tx| !tx.is_closed())
            || self.errors.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

fn send<T>(tx: Option<&mpsc::UnboundedSender<T>>, item: T, stream: &str) -> bool {
    let Some(tx) = tx else {
        tracing::debug!(stream, "send on closed stream ignored");
        return false;
    };
    if tx.send(item).is_err() {
        tracing::debug!(stream, "consumer gone, dropping item");
        return false;
    }
    true
}
