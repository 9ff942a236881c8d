//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{PushConfig, set_config_value};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the store cannot read or parse the configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<PushConfig> {
    store.load()
}

/// Validate and persist a single setting, returning the updated config.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the store fails.
pub fn set_config(store: &impl ConfigStore, key: &str, value: &str) -> Result<PushConfig> {
    let mut config = store.load()?;
    set_config_value(&mut config, key, value)?;
    store.save(&config)?;
    tracing::info!(key, value, "configuration updated");
    Ok(config)
}
