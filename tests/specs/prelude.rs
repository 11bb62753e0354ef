//! Shared helpers for CLI specs
//!
//! A `Project` is a temp directory holding a bare `origin` and a clone of it
//! with one commit on `main`.

#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static BUILD: Once = Once::new();

/// Path to the gw binary, building it if the workspace test run has not
fn gw_bin() -> PathBuf {
    let path = assert_cmd::cargo::cargo_bin("gw");
    BUILD.call_once(|| {
        if !path.exists() {
            let status = std::process::Command::new(option_env!("CARGO").unwrap_or("cargo"))
                .args(["build", "--quiet", "-p", "gw", "--bin", "gw"])
                .current_dir(env!("CARGO_MANIFEST_DIR"))
                .status()
                .expect("failed to build gw");
            assert!(status.success(), "building gw failed");
        }
    });
    path
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_DATE", "2026-01-01T00:00:00Z")
        .env("GIT_COMMITTER_DATE", "2026-01-01T00:00:00Z")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub struct Project {
    dir: TempDir,
}

impl Project {
    /// A directory that is not a repository
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// `origin` (bare) plus a working clone on `main` with one pushed commit
    pub fn with_origin() -> Self {
        let project = Self::empty();
        let root = project.dir.path();
        git(root, &["init", "--quiet", "--bare", "--initial-branch=main", "origin.git"]);
        git(root, &["clone", "--quiet", "origin.git", "work"]);

        let work = project.path();
        configure(&work);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        project.commit("README.md", "# Test\n", "Initial commit");
        git(&work, &["push", "--quiet", "-u", "origin", "main"]);
        git(&work, &["remote", "set-head", "origin", "main"]);
        project
    }

    /// The working clone (or the bare temp dir for `empty`)
    pub fn path(&self) -> PathBuf {
        let work = self.dir.path().join("work");
        if work.exists() {
            work
        } else {
            self.dir.path().to_path_buf()
        }
    }

    pub fn git(&self, args: &[&str]) -> String {
        git(&self.path(), args)
    }

    pub fn file(&self, path: &str, content: &str) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("failed to create dir");
        }
        std::fs::write(full, content).expect("failed to write file");
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("failed to read file")
    }

    pub fn commit(&self, path: &str, content: &str, message: &str) {
        self.file(path, content);
        self.git(&["add", path]);
        self.git(&["commit", "--quiet", "-m", message]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    pub fn branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Push a commit to `origin/main` from a second clone
    pub fn advance_trunk(&self, path: &str, content: &str, message: &str) {
        let other = self.dir.path().join("other");
        if !other.exists() {
            git(self.dir.path(), &["clone", "--quiet", "origin.git", "other"]);
            configure(&other);
        }
        git(&other, &["checkout", "--quiet", "main"]);
        git(&other, &["pull", "--quiet", "--ff-only"]);
        std::fs::write(other.join(path), content).expect("failed to write file");
        git(&other, &["add", path]);
        git(&other, &["commit", "--quiet", "-m", message]);
        git(&other, &["push", "--quiet", "origin", "main"]);
    }

    pub fn origin_has_branch(&self, branch: &str) -> bool {
        let refs = git(
            &self.dir.path().join("origin.git"),
            &["branch", "--list", branch],
        );
        !refs.is_empty()
    }

    pub fn gw(&self) -> Cli {
        let mut cmd = Command::new(gw_bin());
        cmd.current_dir(self.path())
            .env_remove("GW_LOG")
            .env_remove("GITHUB_TOKEN")
            .env("GIT_EDITOR", "true");
        Cli { cmd }
    }
}

fn configure(dir: &Path) {
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Builder around one gw invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Output {
        Output(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Output {
        Output(self.cmd.assert().failure())
    }
}

pub struct Output(assert_cmd::assert::Assert);

impl Output {
    pub fn stdout_has(self, text: &str) -> Self {
        Output(self.0.stdout(predicates::str::contains(text)))
    }

    pub fn stdout_lacks(self, text: &str) -> Self {
        Output(self.0.stdout(predicates::str::contains(text).not()))
    }

    pub fn stderr_has(self, text: &str) -> Self {
        Output(self.0.stderr(predicates::str::contains(text)))
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).to_string()
    }
}
