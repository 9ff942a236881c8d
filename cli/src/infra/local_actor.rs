//! Local control plane: a `PushActor` backed by the file registry.
//!
//! Each `apply` runs as its own tokio task and reports through an
//! `ApplySender`: app create/update, route creation and binding, artifact
//! upload, then `Finished`. Failures go out on the error stream.

use anyhow::{Context, Result};
use chrono::Utc;

use crate::application::ports::PushActor;
use crate::application::streams::{ApplySender, ApplyStreams, apply_channel};
use crate::domain::push::{merge_settings, to_application};
use crate::domain::target::scope_guid;
use crate::domain::{
    ApplicationConfig, CommandLineSettings, ManifestApplication, OperationError, ProgressEvent,
    PushError, Warnings,
};
use crate::infra::fs::artifact_digest;
use crate::infra::registry::{AppRecord, AppRegistry, RouteRecord};

/// Warn once an artifact reaches this share of the quota, in tenths.
const QUOTA_WARN_TENTHS: u64 = 9;

/// `PushActor` that deploys into a registry file on this machine.
#[derive(Debug, Clone)]
pub struct LocalPushActor {
    registry: AppRegistry,
    disk_quota: u64,
}

impl LocalPushActor {
    /// Create an actor over `registry` with a per-app size limit in bytes.
    #[must_use]
    pub fn new(registry: AppRegistry, disk_quota: u64) -> Self {
        Self {
            registry,
            disk_quota,
        }
    }
}

impl PushActor for LocalPushActor {
    fn apply(&self, config: ApplicationConfig) -> ApplyStreams {
        let (tx, streams) = apply_channel();
        let actor = self.clone();
        tokio::spawn(async move {
            let app = config.desired_application.name.clone();
            if let Err(e) = actor.run_apply(&config, &tx).await {
                tracing::debug!(%app, error = %e, "apply failed");
                tx.error(OperationError::new(e));
            }
            drop(tx);
        });
        streams
    }

    async fn convert_to_application_config(
        &self,
        org_guid: &str,
        space_guid: &str,
        apps: Vec<ManifestApplication>,
    ) -> (Result<Vec<ApplicationConfig>>, Warnings) {
        let mut warnings = Warnings::new();
        let mut configs = Vec::with_capacity(apps.len());
        for app in apps {
            let desired = match to_application(app) {
                Ok(desired) => desired,
                Err(e) => return (Err(e.into()), warnings),
            };
            if desired.no_route && desired.hostname.is_some() {
                warnings.push(format!(
                    "hostname for app {} is ignored because no route is requested",
                    desired.name
                ));
            }
            configs.push(ApplicationConfig {
                desired_application: desired,
                org_guid: org_guid.to_string(),
                space_guid: space_guid.to_string(),
            });
        }
        (Ok(configs), warnings)
    }

    fn merge_and_validate_settings_and_manifests(
        &self,
        settings: &CommandLineSettings,
        apps: Vec<ManifestApplication>,
    ) -> Result<Vec<ManifestApplication>> {
        let merged = merge_settings(settings, apps)?;
        for app in &merged {
            if let Some(path) = &app.path {
                if !path.exists() {
                    return Err(PushError::PathNotFound(path.display().to_string()).into());
                }
            }
        }
        Ok(merged)
    }
}

impl LocalPushActor {
    async fn run_apply(&self, config: &ApplicationConfig, tx: &ApplySender) -> Result<()> {
        let app = &config.desired_application;
        let mut state = self.registry.load().await?;
        let now = Utc::now();

        let (mut record, event) = match state.find_app(&config.space_guid, &app.name) {
            Some(existing) => {
                let mut record = existing.clone();
                record.updated_at = now;
                (record, ProgressEvent::Updated)
            }
            None => (
                AppRecord {
                    guid: scope_guid("app", &format!("{}/{}", config.space_guid, app.name)),
                    name: app.name.clone(),
                    org_guid: config.org_guid.clone(),
                    space_guid: config.space_guid.clone(),
                    routes: Vec::new(),
                    artifact_sha256: None,
                    artifact_size: 0,
                    created_at: now,
                    updated_at: now,
                },
                ProgressEvent::Created,
            ),
        };
        state.upsert_app(record.clone());
        self.registry.save(&state).await?;
        if !tx.event(event) {
            return Ok(());
        }

        if app.no_route {
            for host in record.routes.drain(..) {
                tracing::info!(%host, "unbinding route from previous push");
                state.upsert_route(RouteRecord {
                    host,
                    space_guid: config.space_guid.clone(),
                    app_guid: None,
                });
            }
        } else {
            let host = app.route_host();
            match state.find_route(&host) {
                Some(route) => {
                    if let Some(owner) = route.app_guid.as_deref() {
                        if owner != record.guid {
                            anyhow::bail!("route {host} is already in use by another app");
                        }
                    }
                }
                None => {
                    state.upsert_route(RouteRecord {
                        host: host.clone(),
                        space_guid: config.space_guid.clone(),
                        app_guid: None,
                    });
                    if !tx.event(ProgressEvent::RouteCreated) {
                        return Ok(());
                    }
                }
            }
            state.upsert_route(RouteRecord {
                host: host.clone(),
                space_guid: config.space_guid.clone(),
                app_guid: Some(record.guid.clone()),
            });
            if !record.routes.contains(&host) {
                record.routes.push(host);
            }
            if !tx.event(ProgressEvent::RouteBound) {
                return Ok(());
            }
        }

        if !tx.event(ProgressEvent::UploadStarted) {
            return Ok(());
        }
        let path = app.path.clone();
        let digest = tokio::task::spawn_blocking(move || artifact_digest(&path))
            .await
            .context("artifact hash task panicked")??;
        tracing::debug!(sha256 = %digest.sha256, size = digest.size, files = digest.files, "artifact hashed");

        if digest.size > self.disk_quota {
            anyhow::bail!(
                "app {} is {} bytes, which exceeds the disk quota of {} bytes",
                app.name,
                digest.size,
                self.disk_quota
            );
        }
        let mut warnings = Warnings::new();
        if digest.files == 0 {
            warnings.push(format!("app directory {} is empty", app.path.display()));
        }
        if digest.size.saturating_mul(10) >= self.disk_quota.saturating_mul(QUOTA_WARN_TENTHS) {
            warnings.push(format!(
                "disk quota near limit: {} of {} bytes used",
                digest.size, self.disk_quota
            ));
        }

        record.artifact_sha256 = Some(digest.sha256);
        record.artifact_size = digest.size;
        record.updated_at = Utc::now();
        state.upsert_app(record);
        self.registry.save(&state).await?;

        if !tx.event(ProgressEvent::UploadCompleted) {
            return Ok(());
        }
        tx.warnings(warnings);
        tx.event(ProgressEvent::Finished);
        Ok(())
    }
}
