//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::sync::Arc;

use thiserror::Error;

// ── Apply errors ──────────────────────────────────────────────────────────────

/// Fail-fast signal emitted by an apply producer.
///
/// The cause is opaque to the aggregator. Cloning shares the same cause, so
/// the value a caller receives can be compared by identity with what the
/// producer sent (see [`OperationError::is_same`]).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct OperationError(Arc<anyhow::Error>);

impl OperationError {
    /// Wrap an arbitrary cause.
    pub fn new(cause: impl Into<anyhow::Error>) -> Self {
        Self(Arc::new(cause.into()))
    }

    /// The underlying cause.
    #[must_use]
    pub fn cause(&self) -> &anyhow::Error {
        &self.0
    }

    /// Returns `true` when both values carry the very same cause.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Ways an apply run can end without success.
#[derive(Debug, Clone, Error)]
pub enum ApplyError {
    /// The producer reported a failure; passed through unchanged.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// The event stream closed without ever reporting completion.
    #[error("Push of app '{app}' ended before the operation reported completion.")]
    Incomplete { app: String },
}

// ── Target errors ─────────────────────────────────────────────────────────────

/// Errors raised when the configured target is not usable for a push.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("Not logged in. Set a user first: pushctl config set target.user <name>")]
    NotLoggedIn,

    #[error("No org targeted. Target one with: pushctl config set target.org <name>")]
    NoOrganizationTargeted,

    #[error("No space targeted. Target one with: pushctl config set target.space <name>")]
    NoSpaceTargeted,
}

// ── Push errors ───────────────────────────────────────────────────────────────

/// Errors raised while validating the applications to push.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PushError {
    #[error("Incorrect Usage: the required argument APP_NAME was not provided")]
    MissingAppName,

    #[error("Invalid app name '{0}': must match ^[A-Za-z0-9][A-Za-z0-9_.-]*$")]
    InvalidAppName(String),

    #[error("Incorrect Usage: the path '{0}' does not exist")]
    PathNotFound(String),

    #[error("Invalid hostname '{0}': must match ^[a-z0-9]([a-z0-9-]{{0,61}}[a-z0-9])?$")]
    InvalidHostname(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
