//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the stream handles in
//! `crate::application::streams`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::streams::ApplyStreams;
use crate::domain::{
    ApplicationConfig, CommandLineSettings, ManifestApplication, PushConfig, Warnings,
};

// ── Push Actor Port ───────────────────────────────────────────────────────────

/// The operation producer behind `push`.
///
/// `apply` starts the workflow in its own task and returns immediately; all
/// progress, warnings and failures arrive on the returned streams.
#[allow(async_fn_in_trait)]
pub trait PushActor {
    /// Start creating or updating one app.
    fn apply(&self, config: ApplicationConfig) -> ApplyStreams;

    /// Resolve merged manifest entries into per-app apply configurations.
    async fn convert_to_application_config(
        &self,
        org_guid: &str,
        space_guid: &str,
        apps: Vec<ManifestApplication>,
    ) -> (Result<Vec<ApplicationConfig>>, Warnings);

    /// Overlay command-line settings onto manifest entries and validate them.
    fn merge_and_validate_settings_and_manifests(
        &self,
        settings: &CommandLineSettings,
        apps: Vec<ManifestApplication>,
    ) -> Result<Vec<ManifestApplication>>;
}

// ── Display Port ──────────────────────────────────────────────────────────────

/// Synchronous line sink for user-facing output.
///
/// Each call is atomic with respect to the caller: `display_warnings` writes
/// the whole batch as one contiguous run of lines.
pub trait UserInterface {
    /// Display a plain status line.
    fn display_text(&self, text: &str);
    /// Display a single warning.
    fn display_warning(&self, text: &str);
    /// Display a batch of warnings in order.
    fn display_warnings(&self, warnings: &[String]);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    fn load(&self) -> Result<PushConfig>;
    /// Persist the configuration.
    fn save(&self, config: &PushConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
