// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Branch cleaning results

use serde::Serialize;

/// Branches that can be deleted safely, computed fresh on every run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanableBranches {
    /// Safe to delete locally
    pub local: Vec<String>,
    /// Safe to delete on the remote
    pub remote: Vec<String>,
}

impl CleanableBranches {
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.remote.is_empty()
    }
}

/// Outcome of deleting a single branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDeletion {
    pub branch: String,
    pub result: Result<(), String>,
}

impl BranchDeletion {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}
