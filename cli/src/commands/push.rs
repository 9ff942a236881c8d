//! `pushctl push`: create or update an app, wire its route, upload its bits.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::apply_streams::IncompletePolicy;
use crate::application::services::push::{PushOptions, push_applications};
use crate::domain::CommandLineSettings;
use crate::output::json;

/// Arguments for the push command.
#[derive(Args, Debug, Default)]
pub struct PushArgs {
    /// App name
    pub app_name: Option<String>,

    /// Path to app directory or to a zip file of its contents
    #[arg(short = 'p', long)]
    pub path: Option<PathBuf>,

    /// Hostname for the app's route (e.g. my-subdomain)
    #[arg(short = 'n', long)]
    pub hostname: Option<String>,

    /// Domain for the app's route (e.g. example.com)
    #[arg(short = 'd', long)]
    pub domain: Option<String>,

    /// Do not map a route to this app and remove routes from previous pushes
    #[arg(long)]
    pub no_route: bool,
}

impl PushArgs {
    /// Collate flags into push settings; the path defaults to the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no path was given and the working directory is unreadable.
    pub fn command_line_settings(&self) -> Result<CommandLineSettings> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("cannot determine working directory")?,
        };
        Ok(CommandLineSettings {
            name: self.app_name.clone(),
            path,
            hostname: self.hostname.clone(),
            domain: self.domain.clone(),
            no_route: self.no_route,
        })
    }
}

/// Run `pushctl push`.
///
/// # Errors
///
/// Returns an error if the target is incomplete or any app fails to push.
pub async fn run(app: &AppContext, args: &PushArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let actor = app.actor(&config)?;
    let reporter = app.reporter();

    let pushed = push_applications(
        &actor,
        &reporter,
        PushOptions {
            target: &config.target,
            settings: args.command_line_settings()?,
            policy: IncompletePolicy::from_fail_flag(config.apply.fail_on_incomplete),
        },
    )
    .await?;

    if app.is_json() {
        println!("{}", json::format_push_result(&pushed)?);
    } else {
        app.output.success("Push complete");
    }
    Ok(ExitCode::SUCCESS)
}
