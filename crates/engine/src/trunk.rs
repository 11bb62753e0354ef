// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trunk branch resolution

use crate::error::SyncError;
use gw_adapters::VcsAdapter;
use gw_core::SyncConfig;

/// Where the trunk name comes from, in priority order:
/// configured name, the remote's default branch, then a fixed fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrunkPolicy {
    pub configured: Option<String>,
    pub remote: String,
    pub fallback: String,
}

impl TrunkPolicy {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            configured: config.trunk.clone(),
            remote: config.remote.clone(),
            fallback: config.fallback_trunk.clone(),
        }
    }

    pub async fn resolve<V: VcsAdapter>(&self, vcs: &V) -> Result<String, SyncError> {
        if let Some(name) = self.configured.as_deref().filter(|n| !n.is_empty()) {
            return Ok(name.to_string());
        }

        match vcs.default_branch(&self.remote).await {
            Ok(name) if !name.is_empty() => return Ok(name),
            Ok(_) => tracing::debug!(remote = %self.remote, "remote reports no default branch"),
            Err(e) => tracing::debug!(remote = %self.remote, error = %e, "default branch lookup failed"),
        }

        if self.fallback.is_empty() {
            return Err(SyncError::NoTrunk);
        }
        tracing::info!(trunk = %self.fallback, "using fallback trunk");
        Ok(self.fallback.clone())
    }
}

#[cfg(test)]
#[path = "trunk_tests.rs"]
mod tests;
