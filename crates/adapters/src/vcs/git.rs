// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git subprocess adapter

use super::{InProgress, ResetMode, StashEntry, VcsAdapter, VcsError, CONFLICT_MARKER};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;

/// Git-based backend adapter rooted at a working directory
#[derive(Clone, Debug)]
pub struct GitAdapter {
    root: PathBuf,
}

impl GitAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Top-level directory of the working tree containing `root`
    pub async fn toplevel(&self) -> Result<PathBuf, VcsError> {
        let output = self.output(&["rev-parse", "--show-toplevel"]).await?;
        if !output.status.success() {
            return Err(VcsError::NotARepository(self.root.clone()));
        }
        Ok(PathBuf::from(
            String::from_utf8_lossy(&output.stdout).trim(),
        ))
    }

    async fn output(&self, args: &[&str]) -> Result<Output, VcsError> {
        Ok(Command::new("git")
            .current_dir(&self.root)
            // Continuations must never open an editor
            .env("GIT_EDITOR", "true")
            .args(args)
            .output()
            .await?)
    }

    /// Run git, returning trimmed stdout or a `CommandFailed`/`Conflict` error
    async fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = self.output(args).await?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        Err(failure(args, &output))
    }

    async fn run_lines(&self, args: &[&str]) -> Result<Vec<String>, VcsError> {
        let stdout = self.run(args).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn find_stash(&self, stash: &str) -> Result<String, VcsError> {
        if stash.starts_with("stash@{") {
            return Ok(stash.to_string());
        }
        self.stash_list()
            .await?
            .into_iter()
            .find(|entry| entry.matches(stash))
            .map(|entry| entry.selector)
            .ok_or_else(|| VcsError::RefNotFound(format!("stash {}", stash)))
    }
}

/// Build the error for a failed git invocation, keeping conflict output
fn failure(args: &[&str], output: &Output) -> VcsError {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stdout.contains(CONFLICT_MARKER) || stderr.contains(CONFLICT_MARKER) {
        let detail = format!("{}\n{}", stdout.trim(), stderr.trim());
        return VcsError::Conflict(detail.trim().to_string());
    }
    VcsError::CommandFailed {
        cmd: format!("git {}", args.join(" ")),
        stderr: stderr.trim().to_string(),
    }
}

#[async_trait]
impl VcsAdapter for GitAdapter {
    async fn is_repository(&self) -> Result<bool, VcsError> {
        let output = self.output(&["rev-parse", "--is-inside-work-tree"]).await?;
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    async fn git_dir(&self) -> Result<PathBuf, VcsError> {
        let output = self.output(&["rev-parse", "--absolute-git-dir"]).await?;
        if !output.status.success() {
            return Err(VcsError::NotARepository(self.root.clone()));
        }
        Ok(PathBuf::from(
            String::from_utf8_lossy(&output.stdout).trim(),
        ))
    }

    async fn is_clean(&self) -> Result<bool, VcsError> {
        let status = self.run(&["status", "--porcelain"]).await?;
        Ok(status.is_empty())
    }

    async fn current_branch(&self) -> Result<String, VcsError> {
        let branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        if branch == "HEAD" {
            return Err(VcsError::RefNotFound("HEAD is detached".to_string()));
        }
        Ok(branch)
    }

    async fn default_branch(&self, remote: &str) -> Result<String, VcsError> {
        let head = format!("refs/remotes/{}/HEAD", remote);
        let short = self.run(&["symbolic-ref", "--short", &head]).await?;
        let prefix = format!("{}/", remote);
        Ok(short.strip_prefix(&prefix).unwrap_or(&short).to_string())
    }

    async fn in_progress(&self) -> Result<InProgress, VcsError> {
        let git_dir = self.git_dir().await?;
        if git_dir.join("rebase-merge").exists() || git_dir.join("rebase-apply").exists() {
            return Ok(InProgress::Rebase);
        }
        if git_dir.join("MERGE_HEAD").exists() {
            return Ok(InProgress::Merge);
        }
        Ok(InProgress::None)
    }

    async fn checkout(&self, branch: &str) -> Result<(), VcsError> {
        self.run(&["checkout", "--quiet", branch]).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<(), VcsError> {
        self.run(&["fetch", "--all", "--prune", "--quiet"]).await?;
        Ok(())
    }

    async fn pull_ff_only(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.run(&["pull", "--ff-only", "--quiet", remote, branch])
            .await?;
        Ok(())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.run(&[
            "push",
            "--quiet",
            "--force-with-lease",
            "--set-upstream",
            remote,
            branch,
        ])
        .await?;
        Ok(())
    }

    async fn merge_abort(&self) -> Result<(), VcsError> {
        self.run(&["merge", "--abort"]).await?;
        Ok(())
    }

    async fn merge_continue(&self) -> Result<(), VcsError> {
        self.run(&["merge", "--continue"]).await?;
        Ok(())
    }

    async fn rebase_onto(
        &self,
        onto: &str,
        upstream: &str,
        branch: &str,
    ) -> Result<(), VcsError> {
        self.run(&["rebase", "--onto", onto, upstream, branch])
            .await?;
        Ok(())
    }

    async fn rebase_abort(&self) -> Result<(), VcsError> {
        self.run(&["rebase", "--abort"]).await?;
        Ok(())
    }

    async fn rebase_continue(&self) -> Result<(), VcsError> {
        self.run(&["rebase", "--continue"]).await?;
        Ok(())
    }

    async fn stash_push(&self, label: &str) -> Result<(), VcsError> {
        self.run(&["stash", "push", "--include-untracked", "--message", label])
            .await?;
        Ok(())
    }

    async fn stash_pop(&self, stash: &str) -> Result<(), VcsError> {
        let selector = self.find_stash(stash).await?;
        self.run(&["stash", "pop", "--quiet", &selector]).await?;
        Ok(())
    }

    async fn stash_list(&self) -> Result<Vec<StashEntry>, VcsError> {
        let lines = self.run_lines(&["stash", "list", "--format=%gd%x09%gs"]).await?;
        Ok(lines
            .into_iter()
            .filter_map(|line| {
                let (selector, message) = line.split_once('\t')?;
                Some(StashEntry {
                    selector: selector.to_string(),
                    message: message.to_string(),
                })
            })
            .collect())
    }

    async fn reset(&self, target: &str, mode: ResetMode) -> Result<(), VcsError> {
        let flag = match mode {
            ResetMode::Soft => "--soft",
            ResetMode::Keep => "--keep",
        };
        self.run(&["reset", "--quiet", flag, target]).await?;
        Ok(())
    }

    async fn resolve_ref(&self, reference: &str) -> Result<String, VcsError> {
        let spec = format!("{}^{{commit}}", reference);
        let output = self.output(&["rev-parse", "--verify", "--quiet", &spec]).await?;
        if !output.status.success() {
            return Err(VcsError::RefNotFound(reference.to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn local_branches(&self) -> Result<Vec<String>, VcsError> {
        self.run_lines(&["branch", "--format=%(refname:short)"]).await
    }

    async fn merged_branches(&self, base: &str) -> Result<Vec<String>, VcsError> {
        self.run_lines(&["branch", "--merged", base, "--format=%(refname:short)"])
            .await
    }

    async fn remote_branches(&self, remote: &str) -> Result<Vec<String>, VcsError> {
        let prefix = format!("{}/", remote);
        let lines = self
            .run_lines(&["branch", "--remotes", "--format=%(refname:short)"])
            .await?;
        Ok(lines
            .iter()
            .filter_map(|line| line.strip_prefix(&prefix))
            .filter(|name| *name != "HEAD")
            .map(str::to_string)
            .collect())
    }

    async fn delete_branch(&self, branch: &str) -> Result<(), VcsError> {
        self.run(&["branch", "--quiet", "-D", branch]).await?;
        Ok(())
    }

    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        match self.run(&["push", "--quiet", remote, "--delete", branch]).await {
            Ok(_) => Ok(()),
            Err(VcsError::CommandFailed { stderr, .. })
                if stderr.contains("remote ref does not exist") =>
            {
                tracing::debug!(branch, "remote branch already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
