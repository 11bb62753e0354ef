// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake backend adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{InProgress, ResetMode, StashEntry, VcsAdapter, VcsError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Checkout { branch: String },
    FetchAll,
    PullFfOnly { remote: String, branch: String },
    Push { remote: String, branch: String },
    MergeAbort,
    MergeContinue,
    RebaseOnto { onto: String, upstream: String, branch: String },
    RebaseAbort,
    RebaseContinue,
    StashPush { label: String },
    StashPop { stash: String },
    StashList,
    Reset { target: String, mode: ResetMode },
    DeleteBranch { branch: String },
    DeleteRemoteBranch { remote: String, branch: String },
}

/// Failure to inject for a named method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeFailure {
    /// Fail with conflict markers; rebase/merge calls also leave the
    /// operation in progress
    Conflict,
    Command(String),
}

/// Stash entry with the branch and commit it was taken on
#[derive(Debug, Clone)]
struct FakeStash {
    label: String,
    branch: String,
    base: String,
}

#[derive(Debug)]
struct FakeRepo {
    is_repository: bool,
    git_dir: PathBuf,
    current: String,
    /// Local branch name -> head
    branches: BTreeMap<String, String>,
    /// Remote-tracking refs like `origin/main` -> head
    remote_refs: BTreeMap<String, String>,
    /// Commits that resolve to themselves
    commits: HashSet<String>,
    orig_head: Option<String>,
    default_branch: Option<String>,
    dirty: bool,
    in_progress: InProgress,
    stashes: Vec<FakeStash>,
    merged: Vec<String>,
    failures: HashMap<String, FakeFailure>,
    rebase_count: u32,
}

/// In-memory repository that records every mutating call
#[derive(Clone)]
pub struct FakeVcsAdapter {
    repo: Arc<Mutex<FakeRepo>>,
    calls: Arc<Mutex<Vec<VcsCall>>>,
}

impl Default for FakeVcsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeVcsAdapter {
    /// A clean repository on `main` at commit `m1`, with `origin/main` equal
    pub fn new() -> Self {
        let mut branches = BTreeMap::new();
        branches.insert("main".to_string(), "m1".to_string());
        let mut remote_refs = BTreeMap::new();
        remote_refs.insert("origin/main".to_string(), "m1".to_string());
        Self {
            repo: Arc::new(Mutex::new(FakeRepo {
                is_repository: true,
                git_dir: PathBuf::from("/fake/.git"),
                current: "main".to_string(),
                branches,
                remote_refs,
                commits: HashSet::from(["m1".to_string()]),
                orig_head: None,
                default_branch: Some("main".to_string()),
                dirty: false,
                in_progress: InProgress::None,
                stashes: Vec::new(),
                merged: Vec::new(),
                failures: HashMap::new(),
                rebase_count: 0,
            })),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn repo(&self) -> std::sync::MutexGuard<'_, FakeRepo> {
        self.repo.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: VcsCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Count recorded calls matching a predicate
    pub fn count(&self, pred: impl Fn(&VcsCall) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn set_repository(&self, is_repository: bool) {
        self.repo().is_repository = is_repository;
    }

    pub fn set_git_dir(&self, path: impl Into<PathBuf>) {
        self.repo().git_dir = path.into();
    }

    /// Create or move a local branch and make `head` resolvable
    pub fn set_branch(&self, name: &str, head: &str) {
        let mut repo = self.repo();
        repo.branches.insert(name.to_string(), head.to_string());
        repo.commits.insert(head.to_string());
    }

    /// Create a branch and check it out
    pub fn switch_to(&self, name: &str, head: &str) {
        self.set_branch(name, head);
        self.repo().current = name.to_string();
    }

    pub fn set_remote_ref(&self, name: &str, head: &str) {
        let mut repo = self.repo();
        repo.remote_refs.insert(name.to_string(), head.to_string());
        repo.commits.insert(head.to_string());
    }

    pub fn add_commit(&self, hash: &str) {
        self.repo().commits.insert(hash.to_string());
    }

    /// Make a commit unresolvable, as after garbage collection
    pub fn forget_commit(&self, hash: &str) {
        self.repo().commits.remove(hash);
    }

    pub fn set_orig_head(&self, head: &str) {
        let mut repo = self.repo();
        repo.orig_head = Some(head.to_string());
        repo.commits.insert(head.to_string());
    }

    pub fn set_default_branch(&self, branch: Option<&str>) {
        self.repo().default_branch = branch.map(str::to_string);
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.repo().dirty = dirty;
    }

    pub fn set_in_progress(&self, state: InProgress) {
        self.repo().in_progress = state;
    }

    pub fn set_merged(&self, branches: &[&str]) {
        self.repo().merged = branches.iter().map(|b| b.to_string()).collect();
    }

    /// Push a stash entry directly, as if left by an earlier run
    pub fn add_stash(&self, label: &str) {
        let mut repo = self.repo();
        let branch = repo.current.clone();
        let base = repo.branches.get(&branch).cloned().unwrap_or_default();
        repo.stashes.insert(0, FakeStash {
            label: label.to_string(),
            branch,
            base,
        });
    }

    /// Push a stash entry taken on `branch` at commit `base`
    pub fn add_stash_on(&self, label: &str, branch: &str, base: &str) {
        let mut repo = self.repo();
        repo.commits.insert(base.to_string());
        repo.stashes.insert(0, FakeStash {
            label: label.to_string(),
            branch: branch.to_string(),
            base: base.to_string(),
        });
    }

    pub fn fail(&self, method: &str, failure: FakeFailure) {
        self.repo().failures.insert(method.to_string(), failure);
    }

    pub fn clear_failure(&self, method: &str) {
        self.repo().failures.remove(method);
    }

    pub fn branch_head(&self, name: &str) -> Option<String> {
        self.repo().branches.get(name).cloned()
    }

    pub fn current(&self) -> String {
        self.repo().current.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.repo().dirty
    }

    pub fn stashes(&self) -> Vec<String> {
        self.repo().stashes.iter().map(|s| s.label.clone()).collect()
    }

    pub fn remote_ref(&self, name: &str) -> Option<String> {
        self.repo().remote_refs.get(name).cloned()
    }

    /// Return the injected failure for `method`, applying its side effects
    fn injected(&self, method: &str) -> Result<(), VcsError> {
        let mut repo = self.repo();
        match repo.failures.get(method).cloned() {
            None => Ok(()),
            Some(FakeFailure::Conflict) => {
                if method.starts_with("rebase") {
                    repo.in_progress = InProgress::Rebase;
                } else if method.starts_with("merge") {
                    repo.in_progress = InProgress::Merge;
                }
                Err(VcsError::Conflict(
                    "CONFLICT (content): Merge conflict in file.txt".to_string(),
                ))
            }
            Some(FakeFailure::Command(stderr)) => Err(VcsError::CommandFailed {
                cmd: format!("git {}", method),
                stderr,
            }),
        }
    }
}

#[async_trait]
impl VcsAdapter for FakeVcsAdapter {
    async fn is_repository(&self) -> Result<bool, VcsError> {
        Ok(self.repo().is_repository)
    }

    async fn git_dir(&self) -> Result<PathBuf, VcsError> {
        let repo = self.repo();
        if !repo.is_repository {
            return Err(VcsError::NotARepository(PathBuf::from("/fake")));
        }
        Ok(repo.git_dir.clone())
    }

    async fn is_clean(&self) -> Result<bool, VcsError> {
        Ok(!self.repo().dirty)
    }

    async fn current_branch(&self) -> Result<String, VcsError> {
        Ok(self.repo().current.clone())
    }

    async fn default_branch(&self, remote: &str) -> Result<String, VcsError> {
        self.repo()
            .default_branch
            .clone()
            .ok_or_else(|| VcsError::RefNotFound(format!("refs/remotes/{}/HEAD", remote)))
    }

    async fn in_progress(&self) -> Result<InProgress, VcsError> {
        Ok(self.repo().in_progress)
    }

    async fn checkout(&self, branch: &str) -> Result<(), VcsError> {
        self.record(VcsCall::Checkout {
            branch: branch.to_string(),
        });
        self.injected("checkout")?;
        let mut repo = self.repo();
        if !repo.branches.contains_key(branch) {
            return Err(VcsError::RefNotFound(branch.to_string()));
        }
        repo.current = branch.to_string();
        Ok(())
    }

    async fn fetch_all(&self) -> Result<(), VcsError> {
        self.record(VcsCall::FetchAll);
        self.injected("fetch_all")
    }

    async fn pull_ff_only(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record(VcsCall::PullFfOnly {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        self.injected("pull_ff_only")?;
        let mut repo = self.repo();
        if let Some(tip) = repo.remote_refs.get(&format!("{}/{}", remote, branch)).cloned() {
            repo.branches.insert(branch.to_string(), tip);
        }
        Ok(())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record(VcsCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        self.injected("push")?;
        let mut repo = self.repo();
        if let Some(head) = repo.branches.get(branch).cloned() {
            repo.remote_refs.insert(format!("{}/{}", remote, branch), head);
        }
        Ok(())
    }

    async fn merge_abort(&self) -> Result<(), VcsError> {
        self.record(VcsCall::MergeAbort);
        self.injected("merge_abort")?;
        self.repo().in_progress = InProgress::None;
        Ok(())
    }

    async fn merge_continue(&self) -> Result<(), VcsError> {
        self.record(VcsCall::MergeContinue);
        self.injected("merge_continue")?;
        self.repo().in_progress = InProgress::None;
        Ok(())
    }

    async fn rebase_onto(
        &self,
        onto: &str,
        upstream: &str,
        branch: &str,
    ) -> Result<(), VcsError> {
        self.record(VcsCall::RebaseOnto {
            onto: onto.to_string(),
            upstream: upstream.to_string(),
            branch: branch.to_string(),
        });
        {
            let mut repo = self.repo();
            repo.orig_head = repo.branches.get(branch).cloned();
            repo.current = branch.to_string();
        }
        self.injected("rebase_onto")?;

        let mut repo = self.repo();
        repo.rebase_count += 1;
        let onto_head = repo.branches.get(onto).cloned().unwrap_or_default();
        let current_head = repo.branches.get(branch).cloned().unwrap_or_default();
        // Nothing to replay when the branch already sits on `onto`
        let new_head = if current_head == onto_head || upstream == onto_head {
            current_head
        } else {
            format!("{}-rebased-{}", current_head, repo.rebase_count)
        };
        repo.commits.insert(new_head.clone());
        repo.branches.insert(branch.to_string(), new_head);
        Ok(())
    }

    async fn rebase_abort(&self) -> Result<(), VcsError> {
        self.record(VcsCall::RebaseAbort);
        self.injected("rebase_abort")?;
        self.repo().in_progress = InProgress::None;
        Ok(())
    }

    async fn rebase_continue(&self) -> Result<(), VcsError> {
        self.record(VcsCall::RebaseContinue);
        self.injected("rebase_continue")?;
        self.repo().in_progress = InProgress::None;
        Ok(())
    }

    async fn stash_push(&self, label: &str) -> Result<(), VcsError> {
        self.record(VcsCall::StashPush {
            label: label.to_string(),
        });
        self.injected("stash_push")?;
        let mut repo = self.repo();
        let branch = repo.current.clone();
        let base = repo.branches.get(&branch).cloned().unwrap_or_default();
        repo.stashes.insert(0, FakeStash {
            label: label.to_string(),
            branch,
            base,
        });
        repo.dirty = false;
        Ok(())
    }

    async fn stash_pop(&self, stash: &str) -> Result<(), VcsError> {
        self.record(VcsCall::StashPop {
            stash: stash.to_string(),
        });
        self.injected("stash_pop")?;
        let mut repo = self.repo();
        let by_selector = stash_index(stash).filter(|&n| n < repo.stashes.len());
        let position = by_selector
            .or_else(|| repo.stashes.iter().position(|entry| entry.label == stash))
            .ok_or_else(|| VcsError::RefNotFound(format!("stash {}", stash)))?;
        repo.stashes.remove(position);
        repo.dirty = true;
        Ok(())
    }

    async fn stash_list(&self) -> Result<Vec<StashEntry>, VcsError> {
        self.record(VcsCall::StashList);
        let repo = self.repo();
        Ok(repo
            .stashes
            .iter()
            .enumerate()
            .map(|(i, entry)| StashEntry {
                selector: format!("stash@{{{}}}", i),
                message: format!("On {}: {}", entry.branch, entry.label),
            })
            .collect())
    }

    async fn reset(&self, target: &str, mode: ResetMode) -> Result<(), VcsError> {
        self.record(VcsCall::Reset {
            target: target.to_string(),
            mode,
        });
        self.injected("reset")?;
        if mode == ResetMode::Keep {
            self.injected("reset_keep")?;
        }
        let mut repo = self.repo();
        let current = repo.current.clone();
        repo.commits.insert(target.to_string());
        repo.branches.insert(current, target.to_string());
        if mode == ResetMode::Soft {
            repo.dirty = true;
        }
        Ok(())
    }

    async fn resolve_ref(&self, reference: &str) -> Result<String, VcsError> {
        self.injected("resolve_ref")?;
        let repo = self.repo();
        let resolved = match reference {
            "HEAD" => repo.branches.get(&repo.current).cloned(),
            "ORIG_HEAD" => repo.orig_head.clone(),
            // Parent of a stash entry is the commit it was taken on
            other if other.ends_with("^1") => stash_index(other.trim_end_matches("^1"))
                .and_then(|n| repo.stashes.get(n))
                .map(|entry| entry.base.clone()),
            other => repo
                .branches
                .get(other)
                .or_else(|| repo.remote_refs.get(other))
                .cloned()
                .or_else(|| repo.commits.contains(other).then(|| other.to_string())),
        };
        resolved.ok_or_else(|| VcsError::RefNotFound(reference.to_string()))
    }

    async fn local_branches(&self) -> Result<Vec<String>, VcsError> {
        Ok(self.repo().branches.keys().cloned().collect())
    }

    async fn merged_branches(&self, _base: &str) -> Result<Vec<String>, VcsError> {
        self.injected("merged_branches")?;
        Ok(self.repo().merged.clone())
    }

    async fn remote_branches(&self, remote: &str) -> Result<Vec<String>, VcsError> {
        let prefix = format!("{}/", remote);
        Ok(self
            .repo()
            .remote_refs
            .keys()
            .filter_map(|name| name.strip_prefix(&prefix))
            .map(str::to_string)
            .collect())
    }

    async fn delete_branch(&self, branch: &str) -> Result<(), VcsError> {
        self.record(VcsCall::DeleteBranch {
            branch: branch.to_string(),
        });
        self.injected(&format!("delete_branch:{}", branch))?;
        let mut repo = self.repo();
        if repo.branches.remove(branch).is_none() {
            return Err(VcsError::RefNotFound(branch.to_string()));
        }
        Ok(())
    }

    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record(VcsCall::DeleteRemoteBranch {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        self.injected("delete_remote_branch")?;
        self.repo()
            .remote_refs
            .remove(&format!("{}/{}", remote, branch));
        Ok(())
    }
}

/// Position `n` of a `stash@{n}` selector
fn stash_index(selector: &str) -> Option<usize> {
    selector
        .strip_prefix("stash@{")
        .and_then(|rest| rest.strip_suffix('}'))
        .and_then(|n| n.parse().ok())
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
