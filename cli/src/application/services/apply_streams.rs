//! Application service: merge the three apply streams into display output.
//!
//! Imports only from `crate::domain` and `crate::application`.
//!
//! The aggregator is a single sequential loop suspended in one multi-way
//! wait over the event, warning and error streams. The wait has no fixed
//! priority between events and warnings; a queued error is checked first on
//! every iteration and again before anything is rendered. Progress events go
//! through [`render`] to the display sink, warning batches are flushed whole,
//! and the first error ends the run. Success needs the event and warning
//! streams closed and the terminal marker seen, in any order.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::application::ports::UserInterface;
use crate::application::streams::ApplyStreams;
use crate::domain::{ApplyError, DisplayContext, OperationError, ProgressEvent, render};

/// What happens when the event stream closes without a terminal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncompletePolicy {
    /// Keep waiting. With every stream closed the run never returns.
    #[default]
    Wait,
    /// Return [`ApplyError::Incomplete`] as soon as the event stream closes.
    Fail,
}

impl IncompletePolicy {
    /// Map the `apply.fail_on_incomplete` setting to a policy.
    #[must_use]
    pub fn from_fail_flag(fail_on_incomplete: bool) -> Self {
        if fail_on_incomplete {
            Self::Fail
        } else {
            Self::Wait
        }
    }
}

/// Per-run bookkeeping, owned by the aggregator loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct AggregationState {
    events_closed: bool,
    warnings_closed: bool,
    errors_closed: bool,
    complete: bool,
}

impl AggregationState {
    fn is_done(self) -> bool {
        self.events_closed && self.warnings_closed && self.complete
    }
}

/// Consumes one apply run's streams and renders them to a [`UserInterface`].
pub struct StreamAggregator<'a, U: UserInterface> {
    ui: &'a U,
    context: &'a DisplayContext,
    policy: IncompletePolicy,
}

impl<'a, U: UserInterface> StreamAggregator<'a, U> {
    /// Create an aggregator that waits on incomplete runs.
    #[must_use]
    pub fn new(ui: &'a U, context: &'a DisplayContext) -> Self {
        Self {
            ui,
            context,
            policy: IncompletePolicy::Wait,
        }
    }

    /// Override the incomplete-run policy.
    #[must_use]
    pub fn with_policy(mut self, policy: IncompletePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drive the streams until success or the first error.
    ///
    /// The streams are dropped on return, so a producer still sending after
    /// an error sees its channels closed.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::Operation`] with the producer's error unchanged,
    /// or [`ApplyError::Incomplete`] under [`IncompletePolicy::Fail`].
    pub async fn run(&self, streams: ApplyStreams) -> Result<(), ApplyError> {
        let ApplyStreams {
            mut events,
            mut warnings,
            mut errors,
        } = streams;
        let mut state = AggregationState::default();

        loop {
            if let Some(err) = take_error(&mut errors, &mut state) {
                return Err(ApplyError::Operation(err));
            }

            tokio::select! {
                received = errors.recv(), if !state.errors_closed => match received {
                    Some(err) => {
                        tracing::error!(error = %err, "received apply error");
                        return Err(ApplyError::Operation(err));
                    }
                    None => {
                        tracing::debug!("received error stream closed");
                        state.errors_closed = true;
                    }
                },

                received = warnings.recv(), if !state.warnings_closed => match received {
                    Some(batch) => {
                        if let Some(err) = take_error(&mut errors, &mut state) {
                            return Err(ApplyError::Operation(err));
                        }
                        tracing::debug!(count = batch.len(), "received warnings");
                        self.ui.display_warnings(&batch);
                    }
                    None => {
                        tracing::debug!("received warnings stream closed");
                        state.warnings_closed = true;
                    }
                },

                received = events.recv(), if !state.events_closed => match received {
                    Some(event) => {
                        if let Some(err) = take_error(&mut errors, &mut state) {
                            return Err(ApplyError::Operation(err));
                        }
                        self.process_event(event, &mut state);
                    }
                    None => {
                        tracing::debug!("received event stream closed");
                        state.events_closed = true;
                        if !state.complete {
                            self.on_incomplete()?;
                        }
                    }
                },

                else => {
                    tracing::warn!(
                        app = self.app_name(),
                        "all apply streams closed without completion; waiting indefinitely"
                    );
                    std::future::pending::<()>().await;
                }
            }

            if state.is_done() {
                tracing::debug!("breaking apply display loop");
                return Ok(());
            }
        }
    }

    fn process_event(&self, event: ProgressEvent, state: &mut AggregationState) {
        tracing::info!(%event, "received apply event");
        if let Some(line) = render(event, self.context) {
            self.ui.display_text(&line);
        }
        if event.is_terminal() {
            state.complete = true;
        }
    }

    fn on_incomplete(&self) -> Result<(), ApplyError> {
        match self.policy {
            IncompletePolicy::Fail => Err(ApplyError::Incomplete {
                app: self.app_name().to_string(),
            }),
            IncompletePolicy::Wait => {
                tracing::warn!(
                    app = self.app_name(),
                    "event stream closed before the operation finished"
                );
                Ok(())
            }
        }
    }

    fn app_name(&self) -> &str {
        self.context.app_name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Take an error that is already queued, without waiting.
///
/// Checked before every render: an item that arrives after the error was
/// queued is dropped, never shown.
fn take_error(
    errors: &mut mpsc::UnboundedReceiver<OperationError>,
    state: &mut AggregationState,
) -> Option<OperationError> {
    if state.errors_closed {
        return None;
    }
    match errors.try_recv() {
        Ok(err) => {
            tracing::error!(error = %err, "received apply error");
            Some(err)
        }
        Err(TryRecvError::Disconnected) => {
            tracing::debug!("received error stream closed");
            state.errors_closed = true;
            None
        }
        Err(TryRecvError::Empty) => None,
    }
}
