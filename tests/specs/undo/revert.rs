//! `gw undo` reversing a sync

use crate::prelude::*;

#[test]
fn undo_restores_pre_sync_head() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("feature.txt", "feature\n", "Feature work");
    p.advance_trunk("trunk.txt", "trunk\n", "Trunk work");
    let before = p.head();

    p.gw().args(&["sync"]).passes();
    assert_ne!(p.head(), before);

    p.gw()
        .args(&["undo"])
        .passes()
        .stdout_has("Undid")
        .stdout_has("Sync feature with main");

    assert_eq!(p.head(), before);
    assert!(!p.path().join("trunk.txt").exists());
}

#[test]
fn undo_by_id() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("feature.txt", "feature\n", "Feature work");
    p.advance_trunk("trunk.txt", "trunk\n", "Trunk work");
    let before = p.head();
    p.gw().args(&["sync"]).passes();

    let out = p.gw().args(&["history", "--format", "json"]).passes();
    let entries: serde_json::Value = serde_json::from_str(&out.stdout()).unwrap();
    let id = entries[0]["id"].as_str().unwrap().to_string();

    p.gw().args(&["undo", "--id", &id]).passes();
    assert_eq!(p.head(), before);
}

#[test]
fn undo_twice_runs_out() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("feature.txt", "feature\n", "Feature work");
    p.advance_trunk("trunk.txt", "trunk\n", "Trunk work");
    p.gw().args(&["sync"]).passes();

    p.gw().args(&["undo"]).passes();
    p.gw().args(&["undo"]).fails().stderr_has("Nothing to undo");
}

#[test]
fn undo_keeps_edits_to_files_the_sync_changed() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("feature.txt", "feature\n", "Feature work");
    p.advance_trunk("README.md", "# Trunk\n", "Trunk readme");
    let before = p.head();
    p.gw().args(&["sync"]).passes();
    p.file("README.md", "# Trunk\nwip\n");

    p.gw().args(&["undo"]).passes().stdout_has("Undid");

    assert_eq!(p.head(), before);
    assert_eq!(p.read("README.md"), "# Trunk\nwip\n");
}
