// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw clean`

use crate::error::GwError;
use crate::output::{self, OutputFormat};
use crate::workspace::{Vcs, Workspace};
use anyhow::Result;
use clap::Args;
use gw_adapters::{ForgeAdapter, GitHubForge, NoOpForge};
use gw_core::{BranchDeletion, ForgeProvider};
use gw_engine::{BranchCleaner, CleanError};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct CleanArgs {
    /// Also delete the branches on the remote
    #[arg(long)]
    pub remote: bool,

    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct BranchRow {
    branch: String,
    deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<BranchDeletion> for BranchRow {
    fn from(deletion: BranchDeletion) -> Self {
        Self {
            deleted: deletion.succeeded(),
            error: deletion.result.err(),
            branch: deletion.branch,
        }
    }
}

#[derive(Serialize)]
struct CleanReport {
    dry_run: bool,
    local: Vec<BranchRow>,
    remote: Vec<BranchRow>,
}

impl CleanReport {
    fn failures(&self) -> usize {
        self.local
            .iter()
            .chain(&self.remote)
            .filter(|row| row.error.is_some())
            .count()
    }
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.local.is_empty() && self.remote.is_empty() {
            return writeln!(f, "Nothing to clean");
        }
        let sections = [("", &self.local), ("remote ", &self.remote)];
        for (scope, rows) in sections {
            for row in rows {
                match (&row.error, self.dry_run) {
                    (_, true) => writeln!(f, "Would delete {}branch {}", scope, row.branch)?,
                    (None, false) => writeln!(f, "Deleted {}branch {}", scope, row.branch)?,
                    (Some(e), false) => {
                        writeln!(f, "Failed to delete {}branch {}: {}", scope, row.branch, e)?
                    }
                }
            }
        }
        Ok(())
    }
}

pub async fn clean(args: CleanArgs, ws: &Workspace) -> Result<()> {
    let forge = &ws.config.forge;
    let report = match forge.provider {
        ForgeProvider::None => run(args.remote, args.dry_run, ws, NoOpForge::new()).await?,
        ForgeProvider::GitHub => {
            let repository = forge.repository.as_deref().unwrap_or_default();
            let token = std::env::var("GITHUB_TOKEN").ok();
            let github = GitHubForge::new(&forge.api_url, repository, token)?;
            run(args.remote, args.dry_run, ws, github).await?
        }
    };

    output::print(&report, args.format);
    match report.failures() {
        0 => Ok(()),
        n => Err(GwError::new(format!("{} branch deletion(s) failed", n))
            .with_suggestion("Delete them by hand: git branch -D <branch>")
            .into()),
    }
}

async fn run<F: ForgeAdapter>(
    remote: bool,
    dry_run: bool,
    ws: &Workspace,
    forge: F,
) -> Result<CleanReport> {
    let trunk = ws
        .trunk_policy()
        .resolve(&ws.vcs)
        .await
        .map_err(GwError::from_sync)?;
    let cleaner: BranchCleaner<Vcs, F> =
        BranchCleaner::new(ws.vcs.clone(), forge, ws.config.sync.remote.clone());
    let found = cleaner.find_cleanable(&trunk).await.map_err(clean_error)?;
    let remote_branches = if remote { found.remote } else { Vec::new() };

    if dry_run {
        let planned = |branches: Vec<String>| -> Vec<BranchRow> {
            branches
                .into_iter()
                .map(|branch| BranchRow {
                    branch,
                    deleted: false,
                    error: None,
                })
                .collect()
        };
        return Ok(CleanReport {
            dry_run,
            local: planned(found.local),
            remote: planned(remote_branches),
        });
    }

    let local = cleaner.delete_local(&found.local).await;
    let remote = cleaner.delete_remote(&remote_branches).await;
    Ok(CleanReport {
        dry_run,
        local: local.into_iter().map(BranchRow::from).collect(),
        remote: remote.into_iter().map(BranchRow::from).collect(),
    })
}

fn clean_error(err: CleanError) -> GwError {
    GwError::new(format!("Could not list cleanable branches: {}", err)).with_source(err)
}
