// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op forge for repositories without a configured forge.

use super::{ForgeAdapter, ForgeError, PullRequestState};
use async_trait::async_trait;

/// Forge that knows about no pull requests.
///
/// Branch cleaning then relies on merge ancestry alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpForge;

impl NoOpForge {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ForgeAdapter for NoOpForge {
    async fn pull_request_state(
        &self,
        _branch: &str,
    ) -> Result<Option<PullRequestState>, ForgeError> {
        Ok(None)
    }
}
