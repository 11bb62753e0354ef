// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Branch cleaner: finds and deletes branches whose work has landed

use crate::error::CleanError;
use gw_adapters::{ForgeAdapter, VcsAdapter};
use gw_core::{BranchDeletion, CleanableBranches};
use std::collections::BTreeSet;
use tokio::task::JoinSet;

pub struct BranchCleaner<V: VcsAdapter, F: ForgeAdapter> {
    vcs: V,
    forge: F,
    remote: String,
}

impl<V: VcsAdapter, F: ForgeAdapter> BranchCleaner<V, F> {
    pub fn new(vcs: V, forge: F, remote: impl Into<String>) -> Self {
        Self {
            vcs,
            forge,
            remote: remote.into(),
        }
    }

    /// Branches merged into `trunk` or whose pull request is closed or merged.
    ///
    /// The current branch and trunk are never included. A failed forge lookup
    /// leaves that branch out.
    pub async fn find_cleanable(&self, trunk: &str) -> Result<CleanableBranches, CleanError> {
        let current = self.vcs.current_branch().await?;
        let keep = |name: &str| name == current || name == trunk;

        let mut local: BTreeSet<String> = self
            .vcs
            .merged_branches(trunk)
            .await?
            .into_iter()
            .filter(|name| !keep(name))
            .collect();

        for branch in self.vcs.local_branches().await? {
            if keep(&branch) || local.contains(&branch) {
                continue;
            }
            match self.forge.pull_request_state(&branch).await {
                Ok(Some(state)) if state.is_finished() => {
                    tracing::debug!(%branch, ?state, "pull request finished");
                    local.insert(branch);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(%branch, error = %e, "pull request lookup failed"),
            }
        }

        let on_remote: BTreeSet<String> = self
            .vcs
            .remote_branches(&self.remote)
            .await?
            .into_iter()
            .collect();
        let remote = local
            .iter()
            .filter(|name| on_remote.contains(*name))
            .cloned()
            .collect();

        Ok(CleanableBranches {
            local: local.into_iter().collect(),
            remote,
        })
    }

    /// Delete local branches concurrently; results follow the input order
    pub async fn delete_local(&self, branches: &[String]) -> Vec<BranchDeletion> {
        let mut tasks = JoinSet::new();
        for (index, branch) in branches.iter().cloned().enumerate() {
            let vcs = self.vcs.clone();
            tasks.spawn(async move {
                let result = vcs.delete_branch(&branch).await.map_err(|e| e.to_string());
                (index, BranchDeletion { branch, result })
            });
        }

        let mut slots: Vec<Option<BranchDeletion>> = vec![None; branches.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, deletion)) => slots[index] = Some(deletion),
                Err(e) => tracing::error!(error = %e, "branch deletion task failed"),
            }
        }

        slots
            .into_iter()
            .zip(branches)
            .map(|(slot, branch)| {
                slot.unwrap_or_else(|| BranchDeletion {
                    branch: branch.clone(),
                    result: Err("deletion task failed".to_string()),
                })
            })
            .inspect(|deletion| match &deletion.result {
                Ok(()) => tracing::info!(branch = %deletion.branch, "deleted local branch"),
                Err(e) => tracing::warn!(branch = %deletion.branch, error = %e, "local delete failed"),
            })
            .collect()
    }

    /// Delete remote branches one at a time; one already gone counts as deleted
    pub async fn delete_remote(&self, branches: &[String]) -> Vec<BranchDeletion> {
        let mut results = Vec::with_capacity(branches.len());
        for branch in branches {
            let result = self
                .vcs
                .delete_remote_branch(&self.remote, branch)
                .await
                .map_err(|e| e.to_string());
            match &result {
                Ok(()) => tracing::info!(%branch, remote = %self.remote, "deleted remote branch"),
                Err(e) => tracing::warn!(%branch, error = %e, "remote delete failed"),
            }
            results.push(BranchDeletion {
                branch: branch.clone(),
                result,
            });
        }
        results
    }
}

#[cfg(test)]
#[path = "clean_tests.rs"]
mod tests;
