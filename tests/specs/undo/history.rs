//! `gw history`

use crate::prelude::*;

fn synced() -> Project {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("feature.txt", "feature\n", "Feature work");
    p.advance_trunk("trunk.txt", "trunk\n", "Trunk work");
    p.gw().args(&["sync"]).passes();
    p
}

#[test]
fn empty_history() {
    let p = Project::with_origin();
    p.gw()
        .args(&["history"])
        .passes()
        .stdout_has("No operations recorded");
}

#[test]
fn lists_sync() {
    let p = synced();
    p.gw()
        .args(&["history"])
        .passes()
        .stdout_has("Sync feature with main");
}

#[test]
fn json_output() {
    let p = synced();
    let out = p.gw().args(&["history", "--format", "json"]).passes();
    let entries: serde_json::Value = serde_json::from_str(&out.stdout()).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["description"], "Sync feature with main");
}

#[test]
fn until_filter_excludes_recent() {
    let p = synced();
    p.gw()
        .args(&["history", "--until", "2000-01-01T00:00:00Z"])
        .passes()
        .stdout_has("No operations recorded");
}

#[test]
fn undone_operations_leave_history() {
    let p = synced();
    p.gw().args(&["undo"]).passes();
    p.gw()
        .args(&["history"])
        .passes()
        .stdout_has("No operations recorded");
}
