// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Undo service: records reversible operations and reverses them on request

use crate::error::UndoError;
use crate::reversal::Reversal;
use chrono::{DateTime, Utc};
use gw_adapters::VcsAdapter;
use gw_core::{
    Clock, IdGen, Operation, OperationCategory, OperationId, OperationMetadata, SystemClock,
    UuidIdGen,
};
use gw_storage::{HistoryStore, OperationLog};
use std::path::Path;

/// Owns the in-memory operation log of one repository.
///
/// Nothing is persisted implicitly: callers decide when to
/// [`load_history`](Self::load_history) and [`save_history`](Self::save_history).
pub struct UndoService<V: VcsAdapter, C: Clock = SystemClock, I: IdGen = UuidIdGen> {
    vcs: V,
    clock: C,
    id_gen: I,
    log: OperationLog,
}

impl<V: VcsAdapter> UndoService<V> {
    pub fn new(vcs: V, max_history: usize) -> Self {
        Self::with_deps(vcs, SystemClock, UuidIdGen, max_history)
    }
}

impl<V, C, I> UndoService<V, C, I>
where
    V: VcsAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn with_deps(vcs: V, clock: C, id_gen: I, max_history: usize) -> Self {
        Self {
            vcs,
            clock,
            id_gen,
            log: OperationLog::new(max_history),
        }
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    /// Operations inside the inclusive time range, most recent first
    pub fn history(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Vec<&Operation> {
        self.log.between(since, until)
    }

    /// Record an operation anchored at the current HEAD
    pub async fn record_operation(
        &mut self,
        kind: &str,
        description: &str,
        command: &str,
        category: OperationCategory,
        metadata: OperationMetadata,
    ) -> Result<OperationId, UndoError> {
        let op = self.begin(kind, description, command, category).await?;
        Ok(self.commit(Operation { metadata, ..op }))
    }

    /// Build an operation anchored at the current HEAD without recording it.
    ///
    /// Used when the anchor must be captured before the operation mutates
    /// the repository; pass the result to [`commit`](Self::commit) once done.
    pub async fn begin(
        &self,
        kind: &str,
        description: &str,
        command: &str,
        category: OperationCategory,
    ) -> Result<Operation, UndoError> {
        let head = self
            .vcs
            .resolve_ref("HEAD")
            .await
            .map_err(UndoError::HeadUnavailable)?;
        Ok(self.begin_at(head, kind, description, command, category))
    }

    /// Like [`begin`](Self::begin) with an explicit anchor
    pub fn begin_at(
        &self,
        git_ref: impl Into<String>,
        kind: &str,
        description: &str,
        command: &str,
        category: OperationCategory,
    ) -> Operation {
        Operation {
            id: self.id_gen.next(),
            kind: kind.to_string(),
            category,
            description: description.to_string(),
            command: command.to_string(),
            timestamp: self.clock.now(),
            git_ref: git_ref.into(),
            metadata: OperationMetadata::default(),
        }
    }

    /// Append a built operation as the most recent entry
    pub fn commit(&mut self, op: Operation) -> OperationId {
        let id = op.id.clone();
        tracing::info!(
            id = %id,
            kind = %op.kind,
            category = %op.category,
            git_ref = %op.git_ref,
            "recorded operation"
        );
        self.log.push(op);
        id
    }

    /// Reverse one recorded operation and drop it from the log
    pub async fn undo_operation(&mut self, id: &OperationId) -> Result<(), UndoError> {
        let op = self
            .log
            .find(id)
            .cloned()
            .ok_or_else(|| UndoError::OperationNotFound(id.clone()))?;
        let reversal = Reversal::for_category(&op.category)?;

        tracing::info!(id = %id, ?reversal, git_ref = %op.git_ref, "undoing operation");
        reversal.apply(&self.vcs, &op).await?;
        self.log.remove(id);
        Ok(())
    }

    /// Reverse the `count` most recent operations, newest first.
    ///
    /// Stops at the first failure; operations already reversed stay reversed.
    pub async fn undo_last(&mut self, count: usize) -> Result<Vec<OperationId>, UndoError> {
        if count == 0 {
            return Err(UndoError::InvalidCount);
        }
        if self.log.is_empty() {
            return Err(UndoError::NothingToUndo);
        }

        let ids = self.log.recent_ids(count);
        let total = ids.len();
        for (index, id) in ids.iter().enumerate() {
            if let Err(source) = self.undo_operation(id).await {
                return Err(UndoError::AtPosition {
                    position: index + 1,
                    total,
                    source: Box::new(source),
                });
            }
        }
        Ok(ids)
    }

    /// Replace the in-memory log with the persisted one
    pub fn load_history(&mut self, git_dir: &Path) -> Result<(), UndoError> {
        let mut log = HistoryStore::new(git_dir).load()?;
        log.set_max_size(self.log.max_size());
        self.log = log;
        Ok(())
    }

    pub fn save_history(&self, git_dir: &Path) -> Result<(), UndoError> {
        HistoryStore::new(git_dir).save(&self.log)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "undo_tests.rs"]
mod tests;
