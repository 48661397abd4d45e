//! Tracker configuration.
//!
//! Settings are read from TOML. The user-wide file lives at
//! `$XDG_CONFIG_HOME/authorship/authorship.toml`, falling back to the
//! platform config directory.

use crate::error::{AuthorshipError, AuthorshipResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a claim treats a different-owner interval that shares one of its
/// boundaries exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimPolicy {
    /// Split flush intervals like any other overlap, so the claim always
    /// replaces what it covers and the partition stays disjoint.
    #[default]
    Replace,
    /// Leave flush intervals untouched and insert the claim next to them.
    /// May store overlapping intervals of different owners.
    Compatible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TrackerSettings {
    pub claim_policy: ClaimPolicy,
    /// Run the partition consistency check after every operation.
    pub verify_invariants: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            claim_policy: ClaimPolicy::default(),
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl TrackerSettings {
    pub fn from_toml(contents: &str) -> AuthorshipResult<Self> {
        toml::from_str(contents).map_err(|e| AuthorshipError::config(e.to_string()))
    }
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> AuthorshipResult<TrackerSettings> {
    let contents = std::fs::read_to_string(path)?;
    TrackerSettings::from_toml(&contents)
}

/// Load the user-wide settings, falling back to defaults when the file is
/// missing or malformed.
pub fn load_user_settings() -> TrackerSettings {
    let Some(path) = user_config_path() else {
        return TrackerSettings::default();
    };
    if !path.exists() {
        return TrackerSettings::default();
    }

    match load_settings(&path) {
        Ok(settings) => {
            log::debug!(
                target: "authorship::config",
                "Loaded settings from {}",
                path.display()
            );
            settings
        }
        Err(e) => {
            log::warn!(
                target: "authorship::config",
                "Ignoring {}: {}",
                path.display(),
                e
            );
            TrackerSettings::default()
        }
    }
}

/// Returns the path to the user configuration file.
///
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/authorship/authorship.toml
/// 2. Otherwise: <platform config dir>/authorship/authorship.toml
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join("authorship").join("authorship.toml"))
}
