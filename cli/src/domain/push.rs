//! Push settings, manifest merging and per-app apply configuration.
//!
//! Pure functions only: no I/O, no async. Checks that need the filesystem
//! (does the app path exist?) belong to the actor implementation.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::PushError;

/// App names accepted by the control plane.
pub static APP_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid regex")
});

/// Route hostnames: a single DNS label.
pub static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex")
});

/// Domain used for routes when none is given.
pub const DEFAULT_DOMAIN: &str = "apps.local";

/// Settings collated from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLineSettings {
    /// App name from the positional argument.
    pub name: Option<String>,
    /// App directory or artifact file; defaults to the working directory.
    pub path: PathBuf,
    /// Route hostname override.
    pub hostname: Option<String>,
    /// Route domain override.
    pub domain: Option<String>,
    /// Skip route creation and binding.
    pub no_route: bool,
}

/// One application entry as a manifest would describe it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestApplication {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub hostname: Option<String>,
    pub domain: Option<String>,
    pub no_route: bool,
}

/// The app as it should look once the push is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub path: PathBuf,
    pub hostname: Option<String>,
    pub domain: Option<String>,
    pub no_route: bool,
}

impl Application {
    /// Host for the app's route, `{hostname or name}.{domain}`.
    ///
    /// Without an explicit hostname the app name is turned into a valid DNS
    /// label with [`hostname_from_name`].
    #[must_use]
    pub fn route_host(&self) -> String {
        let host = self
            .hostname
            .clone()
            .unwrap_or_else(|| hostname_from_name(&self.name));
        let domain = self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN);
        format!("{host}.{domain}")
    }
}

/// Longest DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Derive a hostname matching [`HOSTNAME_RE`] from an app name.
///
/// Lowercases, replaces every character outside `[a-z0-9-]` with `-`, trims
/// dashes from both ends and caps the length at one DNS label.
#[must_use]
pub fn hostname_from_name(name: &str) -> String {
    let mapped: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .take(MAX_LABEL_LEN)
        .collect();
    let host = mapped.trim_matches('-');
    if host.is_empty() {
        "app".to_string()
    } else {
        host.to_string()
    }
}

/// Everything an apply needs for one app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationConfig {
    pub desired_application: Application,
    pub org_guid: String,
    pub space_guid: String,
}

/// Overlay command-line settings onto manifest applications and validate.
///
/// With no manifest applications the settings alone describe one app. When a
/// name is given on the command line only the matching manifest entry is
/// kept; flags then override that entry's fields.
///
/// # Errors
///
/// Returns a [`PushError`] when a name is missing or invalid, when the named
/// app is not in the manifest, or when a hostname is invalid.
pub fn merge_settings(
    settings: &CommandLineSettings,
    apps: Vec<ManifestApplication>,
) -> Result<Vec<ManifestApplication>, PushError> {
    let mut apps = if apps.is_empty() {
        vec![ManifestApplication::default()]
    } else {
        apps
    };

    if let Some(name) = &settings.name {
        if apps.len() > 1 {
            apps.retain(|app| app.name.as_deref() == Some(name.as_str()));
            if apps.is_empty() {
                return Err(PushError::MissingAppName);
            }
        }
    }

    for app in &mut apps {
        if settings.name.is_some() {
            app.name.clone_from(&settings.name);
        }
        if app.path.is_none() {
            app.path = Some(settings.path.clone());
        }
        if settings.hostname.is_some() {
            app.hostname.clone_from(&settings.hostname);
        }
        if settings.domain.is_some() {
            app.domain.clone_from(&settings.domain);
        }
        app.no_route |= settings.no_route;
        validate_application(app)?;
    }

    Ok(apps)
}

/// Validate a single merged application.
///
/// # Errors
///
/// Returns a [`PushError`] describing the first violation.
pub fn validate_application(app: &ManifestApplication) -> Result<(), PushError> {
    let name = app.name.as_deref().ok_or(PushError::MissingAppName)?;
    if !APP_NAME_RE.is_match(name) {
        return Err(PushError::InvalidAppName(name.to_string()));
    }
    if let Some(host) = &app.hostname {
        if !HOSTNAME_RE.is_match(host) {
            return Err(PushError::InvalidHostname(host.clone()));
        }
    }
    Ok(())
}

/// Turn a merged manifest entry into the app to apply.
///
/// # Errors
///
/// Returns [`PushError::MissingAppName`] if the entry has no name.
pub fn to_application(app: ManifestApplication) -> Result<Application, PushError> {
    let name = app.name.ok_or(PushError::MissingAppName)?;
    Ok(Application {
        name,
        path: app.path.unwrap_or_default(),
        hostname: app.hostname,
        domain: app.domain,
        no_route: app.no_route,
    })
}
