// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Workflow engine: sync with trunk, undo recorded operations, clean branches

mod clean;
mod error;
mod reversal;
mod stash;
mod sync;
mod trunk;
mod undo;

pub use clean::BranchCleaner;
pub use error::{CleanError, SyncError, SyncStep, UndoError};
pub use reversal::Reversal;
pub use stash::{StashGuard, SYNC_STASH_PREFIX};
pub use sync::{conflict_message, stash_label, SyncEngine, SyncMode, SyncOutcome};
pub use trunk::TrunkPolicy;
pub use undo::UndoService;
