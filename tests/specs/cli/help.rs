//! Top-level help and argument validation

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let p = Project::empty();
    let out = p.gw().args(&["--help"]).passes();
    let stdout = out.stdout();
    for command in ["sync", "undo", "history", "clean"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn sync_rejects_abort_with_continue() {
    let p = Project::with_origin();
    p.gw()
        .args(&["sync", "--abort", "--continue"])
        .fails()
        .stderr_has("cannot be used with");
}

#[test]
fn undo_rejects_count_with_id() {
    let p = Project::with_origin();
    p.gw()
        .args(&["undo", "2", "--id", "abc"])
        .fails()
        .stderr_has("cannot be used with");
}
