// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw sync`

use crate::error::GwError;
use crate::workspace::Workspace;
use anyhow::Result;
use clap::Args;
use gw_engine::{SyncEngine, SyncMode, SyncOutcome};

#[derive(Args)]
pub struct SyncArgs {
    /// Back out a paused merge or rebase
    #[arg(long, conflicts_with = "resume")]
    pub abort: bool,

    /// Finish a sync that paused on conflicts
    #[arg(long = "continue")]
    pub resume: bool,
}

impl SyncArgs {
    pub fn mode(&self) -> SyncMode {
        if self.abort {
            SyncMode::Abort
        } else if self.resume {
            SyncMode::Continue
        } else {
            SyncMode::Run
        }
    }
}

pub async fn sync(args: SyncArgs, ws: &Workspace) -> Result<()> {
    let mut undo = ws.undo_service()?;
    let engine = SyncEngine::new(ws.vcs.clone(), ws.trunk_policy());

    let result = engine.sync(args.mode(), &mut undo).await;
    // Partial failures may still have recorded an operation
    ws.save(&undo)?;

    match result.map_err(GwError::from_sync)? {
        SyncOutcome::Synchronized {
            operation_id,
            branch,
            trunk,
            stashed,
        } => {
            if branch == trunk {
                println!("Fast-forwarded {}", trunk);
            } else {
                println!("Synced {} onto {}", branch, trunk);
            }
            if stashed {
                println!("Restored your uncommitted changes");
            }
            println!("Undo with: gw undo (operation {})", operation_id.short());
        }
        SyncOutcome::Resumed {
            operation_id,
            branch,
        } => {
            println!("Finished sync of {}", branch);
            println!("Undo with: gw undo (operation {})", operation_id.short());
        }
        SyncOutcome::UpToDate { branch, trunk } => {
            println!("{} is already up to date with {}", branch, trunk);
        }
        SyncOutcome::Aborted { state, restored } => {
            println!("Aborted {}", state);
            if restored.is_some() {
                println!("Restored your uncommitted changes");
            }
        }
        SyncOutcome::Conflicted { stash, .. } => {
            return Err(GwError::sync_paused(stash.as_deref()).into());
        }
    }
    Ok(())
}
