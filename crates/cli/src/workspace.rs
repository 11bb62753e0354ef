// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository context shared by every command

use crate::error::GwError;
use anyhow::Result;
use gw_adapters::{GitAdapter, TracedVcsAdapter, VcsAdapter};
use gw_core::Config;
use gw_engine::{TrunkPolicy, UndoService};
use std::path::PathBuf;

pub type Vcs = TracedVcsAdapter<GitAdapter>;

/// An opened repository: its control directory, config, and backend
pub struct Workspace {
    pub git_dir: PathBuf,
    pub config: Config,
    pub vcs: Vcs,
}

impl Workspace {
    /// Open the repository containing `repo`, or the current directory
    pub async fn open(repo: Option<PathBuf>) -> Result<Self> {
        let start = match repo {
            Some(path) => path,
            None => std::env::current_dir()?,
        };
        if !start.is_dir() {
            return Err(GwError::not_a_repository(&start).into());
        }

        let git = GitAdapter::new(&start);
        if !git.is_repository().await? {
            return Err(GwError::not_a_repository(&start).into());
        }
        let root = git.toplevel().await?;
        let git_dir = git.git_dir().await?;
        let config = Config::load(&root)?;
        tracing::debug!(root = %root.display(), git_dir = %git_dir.display(), "opened repository");

        Ok(Self {
            vcs: TracedVcsAdapter::new(GitAdapter::new(&root)),
            git_dir,
            config,
        })
    }

    pub fn trunk_policy(&self) -> TrunkPolicy {
        TrunkPolicy::from_config(&self.config.sync)
    }

    /// Undo service with the persisted history loaded
    pub fn undo_service(&self) -> Result<UndoService<Vcs>> {
        let mut undo = UndoService::new(self.vcs.clone(), self.config.undo.max_history);
        undo.load_history(&self.git_dir)
            .map_err(GwError::from_undo)?;
        Ok(undo)
    }

    pub fn save(&self, undo: &UndoService<Vcs>) -> Result<()> {
        undo.save_history(&self.git_dir)
            .map_err(GwError::from_undo)?;
        Ok(())
    }
}
