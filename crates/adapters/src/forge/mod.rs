// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Code-forge adapters (pull request lookups)

mod github;
mod noop;

pub use github::GitHubForge;
pub use noop::NoOpForge;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeForge;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge lookups
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("forge request failed: {0}")]
    Request(String),
    #[error("unexpected forge response: {0}")]
    Response(String),
    #[error("invalid forge repository '{0}', expected owner/name")]
    InvalidRepository(String),
}

/// State of the pull request opened from a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

impl PullRequestState {
    /// Closed and merged pull requests release their branch
    pub fn is_finished(self) -> bool {
        matches!(self, PullRequestState::Closed | PullRequestState::Merged)
    }
}

/// Adapter for the remote code-hosting API
#[async_trait]
pub trait ForgeAdapter: Clone + Send + Sync + 'static {
    /// State of the most recent pull request whose head is `branch`, if any
    async fn pull_request_state(&self, branch: &str)
        -> Result<Option<PullRequestState>, ForgeError>;
}
