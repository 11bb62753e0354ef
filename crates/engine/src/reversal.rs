// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reversal strategies per operation category

use crate::error::UndoError;
use crate::stash::StashGuard;
use gw_adapters::{InProgress, ResetMode, VcsAdapter, VcsError};
use gw_core::{Operation, OperationCategory};

/// How to reverse a recorded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reversal {
    /// Move the branch to the recorded commit's parent, keeping its changes staged
    Commit,
    /// Abort an in-flight merge, or reset to the pre-merge anchor
    Merge,
    /// Abort an in-flight rebase, or reset to the pre-rebase anchor
    Rebase,
}

impl Reversal {
    pub fn for_category(category: &OperationCategory) -> Result<Self, UndoError> {
        match category {
            OperationCategory::Commit => Ok(Reversal::Commit),
            OperationCategory::Merge => Ok(Reversal::Merge),
            OperationCategory::Rebase => Ok(Reversal::Rebase),
            OperationCategory::Other(name) => Err(UndoError::UnsupportedOperation(name.clone())),
        }
    }

    pub async fn apply<V: VcsAdapter>(self, vcs: &V, op: &Operation) -> Result<(), UndoError> {
        match self {
            Reversal::Commit => reverse_commit(vcs, op).await,
            Reversal::Merge => reverse_paused(vcs, op, InProgress::Merge).await,
            Reversal::Rebase => reverse_paused(vcs, op, InProgress::Rebase).await,
        }
    }
}

async fn ensure_resolvable<V: VcsAdapter>(vcs: &V, reference: &str) -> Result<(), UndoError> {
    vcs.resolve_ref(reference)
        .await
        .map(|_| ())
        .map_err(|source| UndoError::UnreversibleRef {
            reference: reference.to_string(),
            source,
        })
}

async fn reverse_commit<V: VcsAdapter>(vcs: &V, op: &Operation) -> Result<(), UndoError> {
    let stash = op.metadata.stashed.then(|| {
        op.metadata
            .stash_ref
            .clone()
            .unwrap_or_else(|| "stash@{0}".to_string())
    });
    let guard = StashGuard::adopt(vcs, stash.clone());

    let (reset, restored) = guard
        .around(async {
            ensure_resolvable(vcs, &op.git_ref).await?;
            let parent = format!("{}~1", op.git_ref);
            vcs.reset(&parent, ResetMode::Soft)
                .await
                .map_err(UndoError::Backend)
        })
        .await;

    match (reset, restored) {
        (Err(e), Err(pop)) => {
            tracing::warn!(error = %pop, "stash restore also failed");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), Err(source)) => Err(UndoError::StashRestore {
            stash: stash.unwrap_or_default(),
            source,
        }),
        (Ok(()), Ok(())) => Ok(()),
    }
}

async fn reverse_paused<V: VcsAdapter>(
    vcs: &V,
    op: &Operation,
    kind: InProgress,
) -> Result<(), UndoError> {
    if vcs.in_progress().await? == kind {
        tracing::info!(%kind, "aborting in-flight operation");
        let aborted: Result<(), VcsError> = match kind {
            InProgress::Rebase => vcs.rebase_abort().await,
            _ => vcs.merge_abort().await,
        };
        return aborted.map_err(UndoError::Backend);
    }

    ensure_resolvable(vcs, &op.git_ref).await?;
    // `--keep` refuses when local edits touch files the reset would change
    if let Err(e) = vcs.reset(&op.git_ref, ResetMode::Keep).await {
        tracing::info!(error = %e, "keep reset refused, leaving changes in the index");
        vcs.reset(&op.git_ref, ResetMode::Soft).await?;
    }
    Ok(())
}
