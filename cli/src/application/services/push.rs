//! Application service: push use-case.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! All I/O is routed through injected port traits.

use anyhow::Result;

use crate::application::ports::{PushActor, UserInterface};
use crate::application::services::apply_streams::{IncompletePolicy, StreamAggregator};
use crate::domain::{ApplicationConfig, CommandLineSettings, DisplayContext, Target, check_target};

/// Shown before every push while the command is experimental.
pub const EXPERIMENTAL_WARNING: &str =
    "This command is in EXPERIMENTAL stage and may change without notice";

/// Inputs for [`push_applications`].
pub struct PushOptions<'a> {
    /// Targeted user, org and space.
    pub target: &'a Target,
    /// Settings collated from flags.
    pub settings: CommandLineSettings,
    /// Behaviour when a run's event stream ends without completion.
    pub policy: IncompletePolicy,
}

/// Push every app described by the settings.
///
/// Apps are applied one after another; the first failure stops the push.
/// Returns the names of the pushed apps, in push order.
///
/// # Errors
///
/// Returns an error if the target is incomplete, the settings do not
/// validate, conversion fails, or any apply run fails.
pub async fn push_applications(
    actor: &impl PushActor,
    ui: &impl UserInterface,
    opts: PushOptions<'_>,
) -> Result<Vec<String>> {
    let PushOptions {
        target,
        settings,
        policy,
    } = opts;
    ui.display_warning(EXPERIMENTAL_WARNING);

    check_target(target, true, true)?;
    let (Some(org), Some(space)) = (&target.org, &target.space) else {
        anyhow::bail!("target is missing an org or space");
    };

    tracing::info!("collating flags");
    tracing::debug!(?settings, "command line settings");

    tracing::info!("merging manifest and command flags");
    let manifest_apps = actor
        .merge_and_validate_settings_and_manifests(&settings, Vec::new())
        .inspect_err(|e| tracing::error!(error = %e, "merging manifest"))?;

    ui.display_text("Getting app info...");

    tracing::info!("converting manifests to application configs");
    let (configs, warnings) = actor
        .convert_to_application_config(&org.guid, &space.guid, manifest_apps)
        .await;
    ui.display_warnings(&warnings);
    let configs = configs.inspect_err(|e| tracing::error!(error = %e, "converting manifest"))?;

    let mut pushed = Vec::with_capacity(configs.len());
    for config in configs {
        let name = config.desired_application.name.clone();
        tracing::info!(app = %name, "starting create/update");
        let context = display_context(&config, target);
        let streams = actor.apply(config);
        StreamAggregator::new(ui, &context)
            .with_policy(policy)
            .run(streams)
            .await
            .inspect_err(|e| tracing::error!(app = %name, error = %e, "apply failed"))?;
        pushed.push(name);
    }

    Ok(pushed)
}

/// Build the presenter context for one app.
#[must_use]
pub fn display_context(config: &ApplicationConfig, target: &Target) -> DisplayContext {
    DisplayContext {
        app_name: Some(config.desired_application.name.clone()),
        org_name: target.org.as_ref().map(|o| o.name.clone()),
        space_name: target.space.as_ref().map(|s| s.name.clone()),
        user_name: target.user.clone(),
    }
}
