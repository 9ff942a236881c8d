//! File-backed app registry used by the local control plane.
//!
//! `AppRegistry` stores app and route records in `apps.json` with atomic
//! writes (temp file + rename). Async access goes through
//! `tokio::task::spawn_blocking`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pushed app as the control plane remembers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    pub guid: String,
    pub name: String,
    pub org_guid: String,
    pub space_guid: String,
    /// Route hosts bound to this app.
    #[serde(default)]
    pub routes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_sha256: Option<String>,
    #[serde(default)]
    pub artifact_size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A route and the app it is bound to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub host: String,
    pub space_guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
}

/// Everything stored in `apps.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryState {
    pub apps: Vec<AppRecord>,
    pub routes: Vec<RouteRecord>,
}

impl RegistryState {
    /// Find an app by space and name.
    #[must_use]
    pub fn find_app(&self, space_guid: &str, name: &str) -> Option<&AppRecord> {
        self.apps
            .iter()
            .find(|a| a.space_guid == space_guid && a.name == name)
    }

    /// Find a route by host.
    #[must_use]
    pub fn find_route(&self, host: &str) -> Option<&RouteRecord> {
        self.routes.iter().find(|r| r.host == host)
    }

    /// Insert or replace an app record, keyed by GUID.
    pub fn upsert_app(&mut self, record: AppRecord) {
        match self.apps.iter_mut().find(|a| a.guid == record.guid) {
            Some(existing) => *existing = record,
            None => self.apps.push(record),
        }
    }

    /// Insert or replace a route record, keyed by host.
    pub fn upsert_route(&mut self, record: RouteRecord) {
        match self.routes.iter_mut().find(|r| r.host == record.host) {
            Some(existing) => *existing = record,
            None => self.routes.push(record),
        }
    }
}

/// Registry file manager.
#[derive(Debug, Clone)]
pub struct AppRegistry {
    path: PathBuf,
}

impl AppRegistry {
    /// Create a registry stored at `path`.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_sync(&self) -> Result<RegistryState> {
        if !self.path.exists() {
            return Ok(RegistryState::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading registry {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing registry {}", self.path.display()))
    }

    fn save_sync(&self, state: &RegistryState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(state).context("serializing registry")?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing registry {}", self.path.display()))?;
        Ok(())
    }

    /// Load the registry, returning an empty one when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<RegistryState> {
        let mgr = self.clone();
        tokio::task::spawn_blocking(move || mgr.load_sync())
            .await
            .context("registry load task panicked")?
    }

    /// Persist the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, state: &RegistryState) -> Result<()> {
        let mgr = self.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || mgr.save_sync(&state))
            .await
            .context("registry save task panicked")?
    }
}
