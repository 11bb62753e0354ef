// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sync, undo, and clean

use gw_adapters::{ForgeError, InProgress, VcsError};
use gw_core::OperationId;
use gw_storage::HistoryError;
use thiserror::Error;

/// Step of the sync protocol, used to say where a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Snapshot,
    ResolveTrunk,
    Fetch,
    Stash,
    UpdateTrunk,
    Rebase,
    Unstash,
    Push,
    Abort,
    Continue,
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SyncStep::Snapshot => "inspecting repository",
            SyncStep::ResolveTrunk => "resolving trunk",
            SyncStep::Fetch => "fetching",
            SyncStep::Stash => "stashing local changes",
            SyncStep::UpdateTrunk => "updating trunk",
            SyncStep::Rebase => "rebasing onto trunk",
            SyncStep::Unstash => "restoring local changes",
            SyncStep::Push => "pushing",
            SyncStep::Abort => "aborting",
            SyncStep::Continue => "continuing",
        };
        f.write_str(name)
    }
}

/// Errors from the sync engine
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not a git repository")]
    NotARepository,
    #[error("nothing to abort: no merge or rebase in progress")]
    NothingToAbort,
    #[error("nothing to continue: no merge or rebase in progress")]
    NothingToContinue,
    #[error("a {0} is already in progress")]
    OperationInProgress(InProgress),
    #[error("no trunk branch could be determined")]
    NoTrunk,
    #[error("{step} failed: {source}")]
    Step { step: SyncStep, source: VcsError },
    #[error("local changes could not be restored from stash '{stash}': {source}")]
    StashPopConflict { stash: String, source: VcsError },
    #[error("aborted, but stash '{stash}' could not be restored: {source}")]
    AbortUnstash { stash: String, source: VcsError },
    #[error(transparent)]
    Record(#[from] UndoError),
}

impl SyncError {
    pub(crate) fn step(step: SyncStep) -> impl FnOnce(VcsError) -> SyncError {
        move |source| SyncError::Step { step, source }
    }
}

/// Errors from the undo service
#[derive(Debug, Error)]
pub enum UndoError {
    #[error("invalid count: must undo at least one operation")]
    InvalidCount,
    #[error("no operations to undo")]
    NothingToUndo,
    #[error("operation not found: {0}")]
    OperationNotFound(OperationId),
    #[error("unsupported operation type: {0}")]
    UnsupportedOperation(String),
    #[error("cannot record operation, HEAD did not resolve: {0}")]
    HeadUnavailable(VcsError),
    #[error("recorded reference {reference} no longer exists: {source}")]
    UnreversibleRef { reference: String, source: VcsError },
    #[error("reversal failed: {0}")]
    Backend(#[from] VcsError),
    #[error("failed to restore stash '{stash}': {source}")]
    StashRestore { stash: String, source: VcsError },
    #[error("undo {position} of {total} failed: {source}")]
    AtPosition {
        position: usize,
        total: usize,
        source: Box<UndoError>,
    },
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Errors from branch cleaning
#[derive(Debug, Error)]
pub enum CleanError {
    #[error(transparent)]
    Vcs(#[from] VcsError),
    #[error(transparent)]
    Forge(#[from] ForgeError),
}
