// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository configuration
//!
//! Read from `.gw.toml` at the repository root. Every section and key is
//! optional; a missing file yields [`Config::default`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up at the repository root
pub const CONFIG_FILE: &str = ".gw.toml";

/// Trunk name used when nothing else names one
pub const DEFAULT_FALLBACK_TRUNK: &str = "main";

/// Default bound on the undo history
pub const DEFAULT_MAX_HISTORY: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sync: SyncConfig,
    pub undo: UndoConfig,
    pub forge: ForgeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Explicit trunk branch; skips asking the backend
    pub trunk: Option<String>,
    /// Used when the backend cannot determine a default branch
    pub fallback_trunk: String,
    pub remote: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            trunk: None,
            fallback_trunk: DEFAULT_FALLBACK_TRUNK.to_string(),
            remote: "origin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UndoConfig {
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForgeProvider {
    #[default]
    None,
    #[serde(alias = "gh")]
    GitHub,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForgeConfig {
    pub provider: ForgeProvider,
    /// `owner/name` on the forge
    pub repository: Option<String>,
    pub api_url: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            provider: ForgeProvider::None,
            repository: None,
            api_url: "https://api.github.com".to_string(),
        }
    }
}

impl Config {
    /// Load `.gw.toml` from the repository root, falling back to defaults
    pub fn load(repo_root: &Path) -> Result<Self, ConfigError> {
        let path = repo_root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.fallback_trunk.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "sync.fallback_trunk must not be empty".to_string(),
            ));
        }
        if matches!(&self.sync.trunk, Some(t) if t.trim().is_empty()) {
            return Err(ConfigError::Invalid("sync.trunk must not be empty".to_string()));
        }
        if self.undo.max_history == 0 {
            return Err(ConfigError::Invalid(
                "undo.max_history must be at least 1".to_string(),
            ));
        }
        if self.forge.provider == ForgeProvider::GitHub && self.forge.repository.is_none() {
            return Err(ConfigError::Invalid(
                "forge.repository is required for the github provider".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
