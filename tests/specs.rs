//! Behavioral specifications for the gw CLI.
//!
//! These tests are black-box: they invoke the CLI binary against real git
//! repositories (each with a bare `origin`) and verify stdout, stderr, and
//! exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// sync/
#[path = "specs/sync/run.rs"]
mod sync_run;
#[path = "specs/sync/conflict.rs"]
mod sync_conflict;

// undo/
#[path = "specs/undo/history.rs"]
mod undo_history;
#[path = "specs/undo/revert.rs"]
mod undo_revert;

// clean/
#[path = "specs/clean/branches.rs"]
mod clean_branches;
