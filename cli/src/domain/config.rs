//! Domain types and validators for push configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::target::{Scope, Target};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "target.user",
    "target.org",
    "target.space",
    "apply.fail_on_incomplete",
    "apply.disk_quota",
];
pub const VALID_BOOLS: &[&str] = &["true", "false"];

/// Default disk quota per app: 1 GiB.
pub const DEFAULT_DISK_QUOTA: u64 = 1024 * 1024 * 1024;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.push/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PushConfig {
    /// Targeted user, org and space.
    #[serde(default)]
    pub target: Target,
    /// Apply behaviour.
    #[serde(default)]
    pub apply: ApplySettings,
}

/// Apply behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplySettings {
    /// Fail instead of waiting when the event stream closes without completion.
    #[serde(default)]
    pub fail_on_incomplete: bool,
    /// Largest artifact accepted for upload, in bytes.
    #[serde(default = "default_disk_quota")]
    pub disk_quota: u64,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            fail_on_incomplete: false,
            disk_quota: default_disk_quota(),
        }
    }
}

fn default_disk_quota() -> u64 {
    DEFAULT_DISK_QUOTA
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.to_string(),
    };
    match key {
        "apply.fail_on_incomplete" if !VALID_BOOLS.contains(&value) => {
            Err(invalid(&VALID_BOOLS.join(", ")).into())
        }
        "apply.disk_quota" if !matches!(value.parse::<u64>(), Ok(n) if n > 0) => {
            Err(invalid("a positive number of bytes").into())
        }
        "target.user" | "target.org" | "target.space" if value.trim().is_empty() => {
            Err(invalid("a non-empty name").into())
        }
        _ => Ok(()),
    }
}

/// Apply a validated key/value pair to `config`.
///
/// Org and space names get a derived GUID. Targeting a new org clears the
/// space, since spaces belong to one org.
///
/// # Errors
///
/// Returns an error if the key or value fails validation.
pub fn set_config_value(config: &mut PushConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;

    match key {
        "target.user" => config.target.user = Some(value.to_string()),
        "target.org" => {
            config.target.org = Some(Scope::named("org", value));
            config.target.space = None;
        }
        "target.space" => config.target.space = Some(Scope::named("space", value)),
        "apply.fail_on_incomplete" => config.apply.fail_on_incomplete = value == "true",
        "apply.disk_quota" => config.apply.disk_quota = value.parse()?,
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
