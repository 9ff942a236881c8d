//! Targeted user, organization and space.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::error::TargetError;

/// A named scope (organization or space) with a stable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub guid: String,
    pub name: String,
}

impl Scope {
    /// Build a scope whose GUID is derived from `kind` and `name`.
    #[must_use]
    pub fn named(kind: &str, name: &str) -> Self {
        Self {
            guid: scope_guid(kind, name),
            name: name.to_string(),
        }
    }
}

/// Where pushes go and who performs them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    /// Current user; `None` means not logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Targeted organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<Scope>,
    /// Targeted space inside `org`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<Scope>,
}

/// Verify the target is complete enough for the requested operation.
///
/// # Errors
///
/// Returns the first missing piece: user, then org (if `require_org`), then
/// space (if `require_space`).
pub fn check_target(
    target: &Target,
    require_org: bool,
    require_space: bool,
) -> Result<(), TargetError> {
    if target.user.is_none() {
        return Err(TargetError::NotLoggedIn);
    }
    if require_org && target.org.is_none() {
        return Err(TargetError::NoOrganizationTargeted);
    }
    if require_space && target.space.is_none() {
        return Err(TargetError::NoSpaceTargeted);
    }
    Ok(())
}

/// Derive a stable GUID-shaped identifier for a scope name.
///
/// Format: `8-4-4-4-12` lowercase hex taken from `sha256("{kind}:{name}")`.
#[must_use]
pub fn scope_guid(kind: &str, name: &str) -> String {
    let digest = Sha256::digest(format!("{kind}:{name}").as_bytes());
    let hex = hex_encode(&digest[..16]);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Encode bytes as lowercase hex.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
