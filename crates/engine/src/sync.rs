// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine: brings a feature branch up to date with trunk.
//!
//! A run walks these steps in order:
//!
//! ```text
//! snapshot -> resolve trunk -> fetch -> [up to date?] -> stash
//!          -> update trunk -> rebase -> unstash -> push -> record
//! ```
//!
//! A rebase conflict pauses the run and leaves the stash in place.
//! `Continue` picks up from the paused rebase or merge; `Abort` backs it out.
//! Both find the paused run's stash by its label and the commit it was
//! taken on, so stashes left by other runs are never touched.
//!
//! On trunk itself there is nothing to rebase: trunk is fast-forwarded.

use crate::error::{SyncError, SyncStep};
use crate::stash::{StashGuard, SYNC_STASH_PREFIX};
use crate::trunk::TrunkPolicy;
use crate::undo::UndoService;
use gw_adapters::{InProgress, StashEntry, VcsAdapter, VcsError};
use gw_core::{Clock, IdGen, Operation, OperationCategory, OperationId};

const SYNC_KIND: &str = "sync";
const SYNC_COMMAND: &str = "gw sync";

/// What the caller asked sync to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    #[default]
    Run,
    Abort,
    Continue,
}

/// Result of a sync call that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synchronized {
        operation_id: OperationId,
        branch: String,
        trunk: String,
        stashed: bool,
    },
    /// Resumed a paused sync and finished it
    Resumed {
        operation_id: OperationId,
        branch: String,
    },
    UpToDate {
        branch: String,
        trunk: String,
    },
    /// Paused on conflicts the user must resolve
    Conflicted {
        step: SyncStep,
        stash: Option<String>,
        message: String,
    },
    /// Backed out a paused merge or rebase, restoring the stash it held
    Aborted {
        state: InProgress,
        restored: Option<String>,
    },
}

/// User-facing guidance for a paused sync
pub fn conflict_message(stash: Option<&str>) -> String {
    let mut message = String::from(
        "Conflicts need to be resolved. Fix the conflicted files, stage them, \
         then run `gw sync --continue`, or run `gw sync --abort` to give up.",
    );
    if let Some(stash) = stash {
        message.push_str(&format!(
            "\nYour local changes are stashed as '{}' and will be restored by `gw sync --continue`.",
            stash
        ));
    }
    message
}

/// Label of the stash a sync run creates
pub fn stash_label(id: &OperationId) -> String {
    format!("{}{}", SYNC_STASH_PREFIX, id)
}

fn sync_stash_label(entry: &StashEntry) -> Option<String> {
    let start = entry.message.find(SYNC_STASH_PREFIX)?;
    Some(entry.message[start..].trim().to_string())
}

pub struct SyncEngine<V: VcsAdapter> {
    vcs: V,
    trunk: TrunkPolicy,
}

impl<V: VcsAdapter> SyncEngine<V> {
    pub fn new(vcs: V, trunk: TrunkPolicy) -> Self {
        Self { vcs, trunk }
    }

    fn remote(&self) -> &str {
        &self.trunk.remote
    }

    pub async fn sync<C: Clock, I: IdGen>(
        &self,
        mode: SyncMode,
        undo: &mut UndoService<V, C, I>,
    ) -> Result<SyncOutcome, SyncError> {
        if !self
            .vcs
            .is_repository()
            .await
            .map_err(SyncError::step(SyncStep::Snapshot))?
        {
            return Err(SyncError::NotARepository);
        }

        tracing::info!(?mode, "sync");
        match mode {
            SyncMode::Run => self.run(undo).await,
            SyncMode::Abort => self.abort().await,
            SyncMode::Continue => self.resume(undo).await,
        }
    }

    async fn run<C: Clock, I: IdGen>(
        &self,
        undo: &mut UndoService<V, C, I>,
    ) -> Result<SyncOutcome, SyncError> {
        let snapshot = SyncStep::Snapshot;
        let state = self
            .vcs
            .in_progress()
            .await
            .map_err(SyncError::step(snapshot))?;
        if state != InProgress::None {
            return Err(SyncError::OperationInProgress(state));
        }
        let branch = self
            .vcs
            .current_branch()
            .await
            .map_err(SyncError::step(snapshot))?;

        let trunk = self.trunk.resolve(&self.vcs).await?;

        self.vcs
            .fetch_all()
            .await
            .map_err(SyncError::step(SyncStep::Fetch))?;

        let head = self
            .vcs
            .resolve_ref("HEAD")
            .await
            .map_err(SyncError::step(snapshot))?;
        let upstream = format!("{}/{}", self.remote(), trunk);
        let trunk_tip = match self.vcs.resolve_ref(&upstream).await {
            Ok(hash) => hash,
            Err(_) => self
                .vcs
                .resolve_ref(&trunk)
                .await
                .map_err(SyncError::step(SyncStep::ResolveTrunk))?,
        };
        if head == trunk_tip {
            tracing::info!(%branch, %trunk, "already up to date");
            return Ok(SyncOutcome::UpToDate { branch, trunk });
        }
        if branch == trunk {
            return self.fast_forward(undo, trunk).await;
        }

        // Anchor the record before anything moves
        let description = format!("Sync {} with {}", branch, trunk);
        let mut op = undo
            .begin(SYNC_KIND, &description, SYNC_COMMAND, OperationCategory::Rebase)
            .await?;
        op.metadata.branch = Some(branch.clone());
        let guard = self.stash_local_changes(&mut op).await?;

        // Old local trunk tip bounds the commits to replay
        let base = match self.vcs.resolve_ref(&trunk).await {
            Ok(hash) => hash,
            Err(_) => upstream.clone(),
        };
        if let Err(e) = self.update_trunk(&trunk).await {
            self.restore_branch(&branch, guard).await;
            return Err(SyncError::Step {
                step: SyncStep::UpdateTrunk,
                source: e,
            });
        }
        if let Err(e) = self.vcs.checkout(&branch).await {
            self.restore_branch(&branch, guard).await;
            return Err(SyncError::Step {
                step: SyncStep::Rebase,
                source: e,
            });
        }

        if let Err(e) = self.vcs.rebase_onto(&trunk, &base, &branch).await {
            if self.paused(&e).await {
                let stash = guard.keep();
                tracing::info!(%branch, %trunk, error = %e, "rebase stopped on conflicts");
                return Ok(SyncOutcome::Conflicted {
                    step: SyncStep::Rebase,
                    message: conflict_message(stash.as_deref()),
                    stash,
                });
            }
            if let Err(pop) = guard.release().await {
                tracing::warn!(error = %pop, "failed to restore stash after rebase failure");
            }
            return Err(SyncError::Step {
                step: SyncStep::Rebase,
                source: e,
            });
        }

        let stashed = guard.is_held();
        let operation_id = self.finish(undo, op, guard, &branch).await?;
        Ok(SyncOutcome::Synchronized {
            operation_id,
            branch,
            trunk,
            stashed,
        })
    }

    /// Stash a dirty tree under the operation's label
    async fn stash_local_changes(&self, op: &mut Operation) -> Result<StashGuard<'_, V>, SyncError> {
        let clean = self
            .vcs
            .is_clean()
            .await
            .map_err(SyncError::step(SyncStep::Snapshot))?;
        if clean {
            return Ok(StashGuard::empty(&self.vcs));
        }
        let label = stash_label(&op.id);
        let guard = StashGuard::push(&self.vcs, &label)
            .await
            .map_err(SyncError::step(SyncStep::Stash))?;
        op.metadata.stashed = true;
        op.metadata.stash_ref = Some(label);
        Ok(guard)
    }

    /// Bring trunk itself up to date; nothing is rebased or pushed
    async fn fast_forward<C: Clock, I: IdGen>(
        &self,
        undo: &mut UndoService<V, C, I>,
        trunk: String,
    ) -> Result<SyncOutcome, SyncError> {
        let description = format!("Fast-forward {}", trunk);
        let mut op = undo
            .begin(SYNC_KIND, &description, SYNC_COMMAND, OperationCategory::Rebase)
            .await?;
        op.metadata.branch = Some(trunk.clone());
        let guard = self.stash_local_changes(&mut op).await?;

        if let Err(e) = self.vcs.pull_ff_only(self.remote(), &trunk).await {
            if let Err(pop) = guard.release().await {
                tracing::warn!(error = %pop, "failed to restore stash after trunk update failure");
            }
            return Err(SyncError::Step {
                step: SyncStep::UpdateTrunk,
                source: e,
            });
        }

        let stashed = guard.is_held();
        let stash = guard.label().map(str::to_string);
        if let Err(source) = guard.release().await {
            undo.commit(op);
            return Err(SyncError::StashPopConflict {
                stash: stash.unwrap_or_default(),
                source,
            });
        }
        let operation_id = undo.commit(op);
        tracing::info!(%trunk, id = %operation_id, "fast-forwarded trunk");
        Ok(SyncOutcome::Synchronized {
            operation_id,
            branch: trunk.clone(),
            trunk,
            stashed,
        })
    }

    async fn update_trunk(&self, trunk: &str) -> Result<(), VcsError> {
        self.vcs.checkout(trunk).await?;
        self.vcs.pull_ff_only(self.remote(), trunk).await
    }

    /// Put the user back on their branch with their changes after a failed step
    async fn restore_branch(&self, branch: &str, guard: StashGuard<'_, V>) {
        if let Err(e) = self.vcs.checkout(branch).await {
            tracing::warn!(%branch, error = %e, "failed to return to branch");
            drop(guard);
            return;
        }
        if let Err(e) = guard.release().await {
            tracing::warn!(error = %e, "failed to restore stashed changes");
        }
    }

    /// Whether a failed merge/rebase call left the repository paused on conflicts
    async fn paused(&self, error: &VcsError) -> bool {
        error.is_conflict()
            || matches!(
                self.vcs.in_progress().await,
                Ok(InProgress::Merge | InProgress::Rebase)
            )
    }

    /// Unstash, push, and record. The record is kept even when a later step fails.
    async fn finish<C: Clock, I: IdGen>(
        &self,
        undo: &mut UndoService<V, C, I>,
        op: Operation,
        guard: StashGuard<'_, V>,
        branch: &str,
    ) -> Result<OperationId, SyncError> {
        let stash = guard.label().map(str::to_string);
        if let Err(source) = guard.release().await {
            undo.commit(op);
            return Err(SyncError::StashPopConflict {
                stash: stash.unwrap_or_default(),
                source,
            });
        }

        let pushed = self.vcs.push(self.remote(), branch).await;
        let id = undo.commit(op);
        pushed.map_err(SyncError::step(SyncStep::Push))?;
        tracing::info!(%branch, id = %id, "sync complete");
        Ok(id)
    }

    async fn abort(&self) -> Result<SyncOutcome, SyncError> {
        let state = self
            .vcs
            .in_progress()
            .await
            .map_err(SyncError::step(SyncStep::Abort))?;
        let aborted = match state {
            InProgress::None => return Err(SyncError::NothingToAbort),
            InProgress::Merge => self.vcs.merge_abort().await,
            InProgress::Rebase => self.vcs.rebase_abort().await,
        };
        aborted.map_err(SyncError::step(SyncStep::Abort))?;
        tracing::info!(%state, "aborted");

        // HEAD is back where the paused run stashed
        let head = self
            .vcs
            .resolve_ref("HEAD")
            .await
            .map_err(SyncError::step(SyncStep::Abort))?;
        let restored = match self.pending_stash(&head, SyncStep::Abort).await? {
            Some(stash) => {
                if let Err(source) = self.vcs.stash_pop(&stash).await {
                    return Err(SyncError::AbortUnstash { stash, source });
                }
                Some(stash)
            }
            None => None,
        };
        Ok(SyncOutcome::Aborted { state, restored })
    }

    async fn resume<C: Clock, I: IdGen>(
        &self,
        undo: &mut UndoService<V, C, I>,
    ) -> Result<SyncOutcome, SyncError> {
        let step = SyncStep::Continue;
        let state = self
            .vcs
            .in_progress()
            .await
            .map_err(SyncError::step(step))?;
        let (continued, category) = match state {
            InProgress::None => return Err(SyncError::NothingToContinue),
            InProgress::Rebase => (self.vcs.rebase_continue().await, OperationCategory::Rebase),
            InProgress::Merge => (self.vcs.merge_continue().await, OperationCategory::Merge),
        };

        // ORIG_HEAD is where the paused rebase or merge started
        let anchor = self
            .vcs
            .resolve_ref("ORIG_HEAD")
            .await
            .map_err(SyncError::step(step))?;
        let pending = self.pending_stash(&anchor, step).await?;
        if let Err(e) = continued {
            if self.paused(&e).await {
                tracing::info!(error = %e, "still conflicted");
                return Ok(SyncOutcome::Conflicted {
                    step,
                    message: conflict_message(pending.as_deref()),
                    stash: pending,
                });
            }
            return Err(SyncError::Step { step, source: e });
        }

        let branch = self
            .vcs
            .current_branch()
            .await
            .map_err(SyncError::step(step))?;
        let description = format!("Sync {} (continued)", branch);
        let mut op = undo.begin_at(anchor, SYNC_KIND, &description, SYNC_COMMAND, category);
        op.metadata.branch = Some(branch.clone());
        if let Some(label) = &pending {
            op.metadata.stashed = true;
            op.metadata.stash_ref = Some(label.clone());
        }

        let guard = StashGuard::adopt(&self.vcs, pending);
        let operation_id = self.finish(undo, op, guard, &branch).await?;
        Ok(SyncOutcome::Resumed {
            operation_id,
            branch,
        })
    }

    /// Label of the stash a paused sync took on top of `base`, if any
    async fn pending_stash(&self, base: &str, step: SyncStep) -> Result<Option<String>, SyncError> {
        let entries = self
            .vcs
            .stash_list()
            .await
            .map_err(SyncError::step(step))?;
        for entry in &entries {
            let Some(label) = sync_stash_label(entry) else {
                continue;
            };
            let parent = format!("{}^1", entry.selector);
            match self.vcs.resolve_ref(&parent).await {
                Ok(hash) if hash == base => return Ok(Some(label)),
                Ok(hash) => tracing::debug!(%label, %hash, "stash belongs to another sync"),
                Err(e) => tracing::debug!(%label, error = %e, "stash base did not resolve"),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
