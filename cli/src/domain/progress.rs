//! Apply progress events and their human-readable rendering.
//!
//! Pure functions only: no I/O, no async. The aggregator calls [`render`]
//! once per received event and hands the resulting line to the display sink.

use std::fmt;

/// Milestones reported by an apply producer, in producer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressEvent {
    /// A new app record was created.
    Created,
    /// An existing app record was updated.
    Updated,
    /// A route was created for the app.
    RouteCreated,
    /// The app's route was bound to it.
    RouteBound,
    /// Artifact upload started.
    UploadStarted,
    /// Artifact upload finished.
    UploadCompleted,
    /// The operation completed. Sole terminal marker.
    Finished,
}

impl ProgressEvent {
    /// Every variant, in the order a full create-and-upload run emits them.
    pub const ALL: [Self; 7] = [
        Self::Created,
        Self::Updated,
        Self::RouteCreated,
        Self::RouteBound,
        Self::UploadStarted,
        Self::UploadCompleted,
        Self::Finished,
    ];

    /// Returns `true` for the event that signals logical completion.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Finished
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "app created",
            Self::Updated => "app updated",
            Self::RouteCreated => "route created",
            Self::RouteBound => "route bound",
            Self::UploadStarted => "upload started",
            Self::UploadCompleted => "upload completed",
            Self::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// One emission of advisory warnings. Order within the batch is significant.
pub type Warnings = Vec<String>;

/// Ambient values the rendered lines refer to.
///
/// Any field may be unset; lines that need a missing field are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayContext {
    /// Name of the app being pushed.
    pub app_name: Option<String>,
    /// Name of the targeted organization.
    pub org_name: Option<String>,
    /// Name of the targeted space.
    pub space_name: Option<String>,
    /// Name of the current user.
    pub user_name: Option<String>,
}

/// Render a progress event as a status line.
///
/// Returns `None` for `Finished` and for events whose template refers to an
/// unset context field.
#[must_use]
pub fn render(event: ProgressEvent, ctx: &DisplayContext) -> Option<String> {
    match event {
        ProgressEvent::Created => app_line("Creating", ctx),
        ProgressEvent::Updated => app_line("Updating", ctx),
        ProgressEvent::RouteCreated => Some("Creating routes...".to_string()),
        ProgressEvent::RouteBound => Some("Binding routes...".to_string()),
        ProgressEvent::UploadStarted => Some("Uploading application...".to_string()),
        ProgressEvent::UploadCompleted => Some("Upload complete".to_string()),
        ProgressEvent::Finished => None,
    }
}

fn app_line(verb: &str, ctx: &DisplayContext) -> Option<String> {
    let app = ctx.app_name.as_deref()?;
    let org = ctx.org_name.as_deref()?;
    let space = ctx.space_name.as_deref()?;
    let user = ctx.user_name.as_deref()?;
    Some(format!(
        "{verb} app {app} in org {org} / space {space} as {user}..."
    ))
}
