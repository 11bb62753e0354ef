// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake forge for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ForgeAdapter, ForgeError, PullRequestState};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Forge with pull request states set by the test
#[derive(Clone, Default)]
pub struct FakeForge {
    states: Arc<Mutex<HashMap<String, PullRequestState>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl FakeForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&self, branch: &str, state: PullRequestState) {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(branch.to_string(), state);
    }

    /// Make lookups for `branch` fail
    pub fn fail_for(&self, branch: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(branch.to_string());
    }
}

#[async_trait]
impl ForgeAdapter for FakeForge {
    async fn pull_request_state(
        &self,
        branch: &str,
    ) -> Result<Option<PullRequestState>, ForgeError> {
        let failing = self.failing.lock().unwrap_or_else(|e| e.into_inner());
        if failing.iter().any(|b| b == branch) {
            return Err(ForgeError::Request(format!("lookup failed for {}", branch)));
        }
        drop(failing);

        Ok(self
            .states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(branch)
            .copied())
    }
}
