// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Every failure shown to the user says:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use gw_adapters::VcsError;
use gw_engine::{SyncError, SyncStep, UndoError};
use gw_storage::HistoryError;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct GwError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GwError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for GwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for GwError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures users hit most often
impl GwError {
    pub fn not_a_repository(path: &std::path::Path) -> Self {
        GwError::new("Not a git repository")
            .with_context(format!("Looked in {}", path.display()))
            .with_suggestion("Run gw inside a git working tree")
            .with_suggestion("Point at one explicitly: gw --repo <path> ...")
    }

    /// A sync that stopped on conflicts; not a failure of gw itself
    pub fn sync_paused(stash: Option<&str>) -> Self {
        let err = GwError::new("Sync paused on conflicts")
            .with_context("The rebase onto trunk stopped where both sides changed the same lines");
        let err = match stash {
            Some(stash) => err.with_context(format!(
                "Your uncommitted changes are stashed as '{}'",
                stash
            )),
            None => err,
        };
        err.with_suggestion("Resolve the conflicts and stage the files: git add <file>")
            .with_suggestion("Then finish the sync: gw sync --continue")
            .with_suggestion("Or give up and restore the branch: gw sync --abort")
    }

    pub fn corrupt_history(err: HistoryError) -> Self {
        let path = match &err {
            HistoryError::Corrupt { path, .. } | HistoryError::Io { path, .. } => {
                Some(path.display().to_string())
            }
            HistoryError::Encode(_) => None,
        };
        let built = GwError::new(format!("Cannot read undo history: {}", err));
        let built = match path {
            Some(path) => built.with_suggestion(format!(
                "Inspect or remove the history file to start fresh: {}",
                path
            )),
            None => built,
        };
        built.with_source(err)
    }

    pub fn from_sync(err: SyncError) -> Self {
        match err {
            SyncError::NotARepository => GwError::new("Not a git repository")
                .with_suggestion("Run gw inside a git working tree"),
            SyncError::NothingToAbort => GwError::new("Nothing to abort")
                .with_context("No merge or rebase is in progress"),
            SyncError::NothingToContinue => GwError::new("Nothing to continue")
                .with_context("No merge or rebase is in progress")
                .with_suggestion("Start a new sync: gw sync"),
            SyncError::OperationInProgress(state) => {
                GwError::new(format!("A {} is already in progress", state))
                    .with_suggestion("Finish it: gw sync --continue")
                    .with_suggestion("Or back it out: gw sync --abort")
            }
            SyncError::NoTrunk => GwError::new("Could not determine the trunk branch")
                .with_suggestion("Name it in .gw.toml under [sync] trunk = \"main\""),
            SyncError::Step { step, source } => step_error(step, source),
            SyncError::StashPopConflict { stash, source } => {
                GwError::new("Synced, but your stashed changes did not apply cleanly")
                    .with_context(format!("The stash '{}' is still in the stash list", stash))
                    .with_suggestion("Resolve the conflicted files, then drop the stash: git stash drop")
                    .with_source(source)
            }
            SyncError::AbortUnstash { stash, source } => {
                GwError::new("Aborted, but your stashed changes did not apply cleanly")
                    .with_context(format!("The stash '{}' is still in the stash list", stash))
                    .with_suggestion(format!("Restore it by hand: git stash pop (look for '{}')", stash))
                    .with_source(source)
            }
            SyncError::Record(err) => undo_error(err),
        }
    }

    pub fn from_undo(err: UndoError) -> Self {
        undo_error(err)
    }
}

fn step_error(step: SyncStep, source: VcsError) -> GwError {
    let err = GwError::new(format!("Sync failed while {}", step));
    let err = match step {
        SyncStep::Fetch => err.with_context("The remote could not be reached or refused the fetch"),
        SyncStep::UpdateTrunk => err
            .with_context("Trunk could not be fast-forwarded to the remote")
            .with_context("You are back on your branch with your changes restored"),
        SyncStep::Push => err
            .with_context("The branch was rebased locally; the push was rejected")
            .with_suggestion("Undo the rebase: gw undo"),
        _ => err,
    };
    let err = if source.is_conflict() {
        err.with_suggestion("Resolve the conflicts, then run: gw sync --continue")
            .with_suggestion("Or run: gw sync --abort")
    } else {
        err
    };
    err.with_context(source.to_string()).with_source(source)
}

fn undo_error(err: UndoError) -> GwError {
    match err {
        UndoError::InvalidCount => {
            GwError::new("Invalid count").with_context("Undo needs to reverse at least one operation")
        }
        UndoError::NothingToUndo => GwError::new("Nothing to undo")
            .with_context("No operations have been recorded in this repository")
            .with_suggestion("See what was recorded: gw history"),
        UndoError::OperationNotFound(id) => GwError::new(format!("Operation '{}' not found", id))
            .with_suggestion("List recorded operations: gw history"),
        UndoError::UnsupportedOperation(kind) => {
            GwError::new(format!("Operations of type '{}' cannot be undone", kind))
        }
        UndoError::UnreversibleRef { reference, source } => {
            GwError::new(format!("Cannot undo: commit {} no longer exists", reference))
                .with_context("It may have been garbage collected or rewritten")
                .with_source(source)
        }
        UndoError::AtPosition {
            position,
            total,
            source,
        } => {
            let inner = undo_error(*source);
            let mut err = GwError::new(format!(
                "Undo {} of {} failed: {}",
                position, total, inner.message
            ));
            if position > 1 {
                err = err.with_context(format!(
                    "The {} most recent operation(s) were undone",
                    position - 1
                ));
            }
            err.context.extend(inner.context);
            err.suggestions.extend(inner.suggestions);
            err
        }
        UndoError::History(source) => GwError::corrupt_history(source),
        other => GwError::new(other.to_string()).with_source(other),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
