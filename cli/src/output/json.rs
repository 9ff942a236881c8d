//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails.

use anyhow::{Context, Result};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format the JSON result of a successful push.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "success": true,
///   "apps": ["..."]
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_push_result(apps: &[String]) -> Result<String> {
    let obj = serde_json::json!({
        "success": true,
        "apps": apps,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Map an error chain to a stable machine-readable code.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::{ApplyError, ConfigError, PushError, TargetError};

    if let Some(e) = err.downcast_ref::<ApplyError>() {
        return match e {
            ApplyError::Operation(_) => "APPLY_FAILED",
            ApplyError::Incomplete { .. } => "APPLY_INCOMPLETE",
        };
    }
    if err.downcast_ref::<TargetError>().is_some() {
        return "TARGET_NOT_SET";
    }
    if err.downcast_ref::<PushError>().is_some() {
        return "INVALID_USAGE";
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "INVALID_CONFIG";
    }
    "INTERNAL"
}
