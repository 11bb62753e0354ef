//! User-facing errors

use crate::prelude::*;

#[test]
fn outside_a_repository() {
    let p = Project::empty();
    p.gw()
        .args(&["history"])
        .fails()
        .stderr_has("Not a git repository");
}

#[test]
fn repo_flag_pointing_nowhere() {
    let p = Project::with_origin();
    p.gw()
        .args(&["--repo", "does-not-exist", "history"])
        .fails()
        .stderr_has("Not a git repository");
}

#[test]
fn undo_with_empty_history() {
    let p = Project::with_origin();
    p.gw().args(&["undo"]).fails().stderr_has("Nothing to undo");
}

#[test]
fn undo_zero_operations() {
    let p = Project::with_origin();
    p.gw().args(&["undo", "0"]).fails().stderr_has("Invalid count");
}

#[test]
fn undo_unknown_id() {
    let p = Project::with_origin();
    p.gw()
        .args(&["undo", "--id", "missing"])
        .fails()
        .stderr_has("Operation 'missing' not found");
}

#[test]
fn abort_without_paused_sync() {
    let p = Project::with_origin();
    p.gw()
        .args(&["sync", "--abort"])
        .fails()
        .stderr_has("Nothing to abort");
}

#[test]
fn corrupt_history_is_reported() {
    let p = Project::with_origin();
    let dir = p.path().join(".git/gw");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("history.json"), "{not json").unwrap();
    p.gw()
        .args(&["history"])
        .fails()
        .stderr_has("Cannot read undo history");
}
