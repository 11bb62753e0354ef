// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-core: domain types shared by the gw crates
//!
//! This crate provides:
//! - The `Operation` record kept in the undo history
//! - Clock and ID abstractions so records are reproducible in tests
//! - Repository configuration loaded from `.gw.toml`
//! - Branch-cleaning result types

pub mod branch;
pub mod clock;
pub mod config;
pub mod id;
pub mod operation;

pub use branch::{BranchDeletion, CleanableBranches};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, ForgeConfig, ForgeProvider, SyncConfig, UndoConfig};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use operation::{Operation, OperationCategory, OperationId, OperationMetadata};
