// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the version-control backend and the code forge

pub mod forge;
pub mod traced;
pub mod vcs;

pub use forge::{ForgeAdapter, ForgeError, GitHubForge, NoOpForge, PullRequestState};
pub use traced::TracedVcsAdapter;
pub use vcs::{GitAdapter, InProgress, ResetMode, StashEntry, VcsAdapter, VcsError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use forge::FakeForge;
#[cfg(any(test, feature = "test-support"))]
pub use vcs::{FakeFailure, FakeVcsAdapter, VcsCall};
