//! `pushctl config`: show and set configuration values.

use anyhow::Result;
use clap::Subcommand;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::domain::PushConfig;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, validated, or saved.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => {
            config_service::set_config(&app.config_store, &key, &value)?;
            app.output.success(&format!("Set {key} = {value}"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    if app.is_json() {
        println!("{}", config_json(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let path = app.config_store.path()?;
    let ctx = &app.output;
    ctx.header(&format!("Configuration ({})", path.display()));
    let unset = "(not set)";
    let target = &config.target;
    ctx.kv("target.user:", target.user.as_deref().unwrap_or(unset));
    ctx.kv(
        "target.org:",
        target.org.as_ref().map_or(unset, |o| o.name.as_str()),
    );
    ctx.kv(
        "target.space:",
        target.space.as_ref().map_or(unset, |s| s.name.as_str()),
    );
    ctx.kv(
        "apply.fail_on_incomplete:",
        &config.apply.fail_on_incomplete.to_string(),
    );
    ctx.kv("apply.disk_quota:", &config.apply.disk_quota.to_string());
    Ok(ExitCode::SUCCESS)
}

fn config_json(config: &PushConfig) -> Result<String> {
    let target = &config.target;
    let obj = serde_json::json!({
        "target": {
            "user": target.user,
            "org": target.org.as_ref().map(|o| &o.name),
            "org_guid": target.org.as_ref().map(|o| &o.guid),
            "space": target.space.as_ref().map(|s| &s.name),
            "space_guid": target.space.as_ref().map(|s| &s.guid),
        },
        "apply": {
            "fail_on_incomplete": config.apply.fail_on_incomplete,
            "disk_quota": config.apply.disk_quota,
        },
    });
    Ok(serde_json::to_string_pretty(&obj)?)
}
