// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::vcs::{InProgress, ResetMode, StashEntry, VcsAdapter, VcsError};
use async_trait::async_trait;
use std::future::Future;
use std::path::PathBuf;
use tracing::Instrument;

/// Wrapper that adds tracing to any VcsAdapter
#[derive(Clone)]
pub struct TracedVcsAdapter<V> {
    inner: V,
}

impl<V> TracedVcsAdapter<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }
}

/// Run a mutating backend call inside `span`, logging its outcome and timing
async fn observe<T, F>(span: tracing::Span, fut: F) -> Result<T, VcsError>
where
    F: Future<Output = Result<T, VcsError>>,
{
    async move {
        tracing::info!("starting");
        let start = std::time::Instant::now();
        let result = fut.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(elapsed_ms, "done"),
            // Callers decide how loudly a failure is reported
            Err(e) if e.is_conflict() => tracing::debug!(elapsed_ms, error = %e, "conflict"),
            Err(e) => tracing::debug!(elapsed_ms, error = %e, "failed"),
        }
        result
    }
    .instrument(span)
    .await
}

#[async_trait]
impl<V: VcsAdapter> VcsAdapter for TracedVcsAdapter<V> {
    async fn is_repository(&self) -> Result<bool, VcsError> {
        let result = self.inner.is_repository().await;
        tracing::trace!(is_repository = ?result.as_ref().ok(), "checked");
        result
    }

    async fn git_dir(&self) -> Result<PathBuf, VcsError> {
        self.inner.git_dir().await
    }

    async fn is_clean(&self) -> Result<bool, VcsError> {
        let result = self.inner.is_clean().await;
        tracing::debug!(clean = ?result.as_ref().ok(), "checked working tree");
        result
    }

    async fn current_branch(&self) -> Result<String, VcsError> {
        let result = self.inner.current_branch().await;
        tracing::trace!(branch = ?result.as_ref().ok(), "current branch");
        result
    }

    async fn default_branch(&self, remote: &str) -> Result<String, VcsError> {
        let result = self.inner.default_branch(remote).await;
        if let Err(e) = &result {
            tracing::debug!(remote, error = %e, "default branch unavailable");
        }
        result
    }

    async fn in_progress(&self) -> Result<InProgress, VcsError> {
        let result = self.inner.in_progress().await;
        tracing::debug!(state = ?result.as_ref().ok(), "checked in-progress state");
        result
    }

    async fn checkout(&self, branch: &str) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.checkout", branch),
            self.inner.checkout(branch),
        )
        .await
    }

    async fn fetch_all(&self) -> Result<(), VcsError> {
        observe(tracing::info_span!("vcs.fetch_all"), self.inner.fetch_all()).await
    }

    async fn pull_ff_only(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.pull_ff_only", remote, branch),
            self.inner.pull_ff_only(remote, branch),
        )
        .await
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.push", remote, branch),
            self.inner.push(remote, branch),
        )
        .await
    }

    async fn merge_abort(&self) -> Result<(), VcsError> {
        observe(tracing::info_span!("vcs.merge_abort"), self.inner.merge_abort()).await
    }

    async fn merge_continue(&self) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.merge_continue"),
            self.inner.merge_continue(),
        )
        .await
    }

    async fn rebase_onto(
        &self,
        onto: &str,
        upstream: &str,
        branch: &str,
    ) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.rebase_onto", onto, upstream, branch),
            self.inner.rebase_onto(onto, upstream, branch),
        )
        .await
    }

    async fn rebase_abort(&self) -> Result<(), VcsError> {
        observe(tracing::info_span!("vcs.rebase_abort"), self.inner.rebase_abort()).await
    }

    async fn rebase_continue(&self) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.rebase_continue"),
            self.inner.rebase_continue(),
        )
        .await
    }

    async fn stash_push(&self, label: &str) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.stash_push", label),
            self.inner.stash_push(label),
        )
        .await
    }

    async fn stash_pop(&self, stash: &str) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.stash_pop", stash),
            self.inner.stash_pop(stash),
        )
        .await
    }

    async fn stash_list(&self) -> Result<Vec<StashEntry>, VcsError> {
        let result = self.inner.stash_list().await;
        tracing::trace!(count = result.as_ref().map(|v| v.len()).ok(), "listed stashes");
        result
    }

    async fn reset(&self, target: &str, mode: ResetMode) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.reset", target, mode = ?mode),
            self.inner.reset(target, mode),
        )
        .await
    }

    async fn resolve_ref(&self, reference: &str) -> Result<String, VcsError> {
        let result = self.inner.resolve_ref(reference).await;
        tracing::trace!(reference, resolved = ?result.as_ref().ok(), "resolved");
        result
    }

    async fn local_branches(&self) -> Result<Vec<String>, VcsError> {
        let result = self.inner.local_branches().await;
        tracing::trace!(count = result.as_ref().map(|v| v.len()).ok(), "local branches");
        result
    }

    async fn merged_branches(&self, base: &str) -> Result<Vec<String>, VcsError> {
        let result = self.inner.merged_branches(base).await;
        tracing::debug!(base, count = result.as_ref().map(|v| v.len()).ok(), "merged branches");
        result
    }

    async fn remote_branches(&self, remote: &str) -> Result<Vec<String>, VcsError> {
        let result = self.inner.remote_branches(remote).await;
        tracing::trace!(remote, count = result.as_ref().map(|v| v.len()).ok(), "remote branches");
        result
    }

    async fn delete_branch(&self, branch: &str) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.delete_branch", branch),
            self.inner.delete_branch(branch),
        )
        .await
    }

    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        observe(
            tracing::info_span!("vcs.delete_remote_branch", remote, branch),
            self.inner.delete_remote_branch(remote, branch),
        )
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
