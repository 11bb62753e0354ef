// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version-control backend adapters

mod git;

pub use git::GitAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFailure, FakeVcsAdapter, VcsCall};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Marker git prints for a merge or rebase that stopped on conflicts
pub const CONFLICT_MARKER: &str = "CONFLICT";

/// Errors from backend operations
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("reference not found: {0}")]
    RefNotFound(String),
    #[error("`{cmd}` failed: {stderr}")]
    CommandFailed { cmd: String, stderr: String },
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),
}

impl VcsError {
    /// Whether the failure carries merge/rebase conflict markers
    pub fn is_conflict(&self) -> bool {
        match self {
            VcsError::Conflict(_) => true,
            VcsError::CommandFailed { stderr, .. } => stderr.contains(CONFLICT_MARKER),
            _ => false,
        }
    }
}

/// Multi-step operation the backend is currently paused in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InProgress {
    #[default]
    None,
    Merge,
    Rebase,
}

impl std::fmt::Display for InProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InProgress::None => write!(f, "none"),
            InProgress::Merge => write!(f, "merge"),
            InProgress::Rebase => write!(f, "rebase"),
        }
    }
}

/// How a reset treats the index and working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Move the branch only; changes stay staged
    Soft,
    /// Move the branch and working tree, refusing if local edits would be lost
    Keep,
}

/// An entry of the stash list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashEntry {
    /// Selector such as `stash@{0}`
    pub selector: String,
    pub message: String,
}

impl StashEntry {
    pub fn matches(&self, label: &str) -> bool {
        self.selector == label || self.message.contains(label)
    }
}

/// Adapter for the version-control backend
#[async_trait]
pub trait VcsAdapter: Clone + Send + Sync + 'static {
    /// Whether the working directory is inside a repository
    async fn is_repository(&self) -> Result<bool, VcsError>;

    /// Absolute path of the repository's control directory
    async fn git_dir(&self) -> Result<PathBuf, VcsError>;

    /// Whether the working tree has no uncommitted or untracked changes
    async fn is_clean(&self) -> Result<bool, VcsError>;

    async fn current_branch(&self) -> Result<String, VcsError>;

    /// Default branch advertised by the remote
    async fn default_branch(&self, remote: &str) -> Result<String, VcsError>;

    async fn in_progress(&self) -> Result<InProgress, VcsError>;

    async fn checkout(&self, branch: &str) -> Result<(), VcsError>;

    async fn fetch_all(&self) -> Result<(), VcsError>;

    /// Pull that only ever fast-forwards
    async fn pull_ff_only(&self, remote: &str, branch: &str) -> Result<(), VcsError>;

    async fn push(&self, remote: &str, branch: &str) -> Result<(), VcsError>;

    async fn merge_abort(&self) -> Result<(), VcsError>;

    async fn merge_continue(&self) -> Result<(), VcsError>;

    /// Replay `upstream..branch` on top of `onto`
    async fn rebase_onto(&self, onto: &str, upstream: &str, branch: &str)
        -> Result<(), VcsError>;

    async fn rebase_abort(&self) -> Result<(), VcsError>;

    async fn rebase_continue(&self) -> Result<(), VcsError>;

    /// Stash local edits (including untracked files) under a label
    async fn stash_push(&self, label: &str) -> Result<(), VcsError>;

    /// Pop the stash identified by label or selector
    async fn stash_pop(&self, stash: &str) -> Result<(), VcsError>;

    async fn stash_list(&self) -> Result<Vec<StashEntry>, VcsError>;

    async fn reset(&self, target: &str, mode: ResetMode) -> Result<(), VcsError>;

    /// Resolve a reference to a commit hash
    async fn resolve_ref(&self, reference: &str) -> Result<String, VcsError>;

    async fn local_branches(&self) -> Result<Vec<String>, VcsError>;

    /// Local branches fully merged into `base`
    async fn merged_branches(&self, base: &str) -> Result<Vec<String>, VcsError>;

    /// Branch names present on the remote, without the remote prefix
    async fn remote_branches(&self, remote: &str) -> Result<Vec<String>, VcsError>;

    async fn delete_branch(&self, branch: &str) -> Result<(), VcsError>;

    /// Delete a remote branch; one that is already gone counts as deleted
    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<(), VcsError>;
}
