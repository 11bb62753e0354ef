// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped ownership of a stash entry

use gw_adapters::{VcsAdapter, VcsError};
use std::future::Future;

/// Label prefix of stashes created by sync
pub const SYNC_STASH_PREFIX: &str = "gw-sync-";

/// Stash that must be popped, or deliberately kept, before the guard goes away.
///
/// An empty guard holds nothing and releasing it is a no-op.
#[must_use = "a held stash must be released or kept"]
pub struct StashGuard<'a, V: VcsAdapter> {
    vcs: &'a V,
    stash: Option<String>,
}

impl<'a, V: VcsAdapter> StashGuard<'a, V> {
    pub fn empty(vcs: &'a V) -> Self {
        Self { vcs, stash: None }
    }

    /// Take responsibility for a stash that already exists
    pub fn adopt(vcs: &'a V, stash: Option<String>) -> Self {
        Self { vcs, stash }
    }

    /// Stash local changes under `label`
    pub async fn push(vcs: &'a V, label: &str) -> Result<Self, VcsError> {
        vcs.stash_push(label).await?;
        tracing::debug!(label, "stashed local changes");
        Ok(Self::adopt(vcs, Some(label.to_string())))
    }

    pub fn label(&self) -> Option<&str> {
        self.stash.as_deref()
    }

    pub fn is_held(&self) -> bool {
        self.stash.is_some()
    }

    /// Pop the stash back onto the working tree
    pub async fn release(mut self) -> Result<(), VcsError> {
        let Some(stash) = self.stash.take() else {
            return Ok(());
        };
        self.vcs.stash_pop(&stash).await?;
        tracing::debug!(stash = %stash, "restored stashed changes");
        Ok(())
    }

    /// Leave the stash in place and hand back its label
    pub fn keep(mut self) -> Option<String> {
        self.stash.take()
    }

    /// Run `work`, then release the stash whatever `work` returned
    pub async fn around<T, E, F>(self, work: F) -> (Result<T, E>, Result<(), VcsError>)
    where
        F: Future<Output = Result<T, E>>,
    {
        let result = work.await;
        let restored = self.release().await;
        (result, restored)
    }
}

impl<V: VcsAdapter> Drop for StashGuard<'_, V> {
    fn drop(&mut self) {
        if let Some(stash) = &self.stash {
            tracing::warn!(stash = %stash, "stash left in place; restore it with `git stash pop`");
        }
    }
}

#[cfg(test)]
#[path = "stash_tests.rs"]
mod tests;
