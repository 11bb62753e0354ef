//! `gw sync` on a branch that can be rebased cleanly

use crate::prelude::*;

fn feature_behind_trunk() -> Project {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("feature.txt", "feature\n", "Feature work");
    p.advance_trunk("trunk.txt", "trunk\n", "Trunk work");
    p
}

#[test]
fn already_up_to_date() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.gw()
        .args(&["sync"])
        .passes()
        .stdout_has("feature is already up to date with main");
}

#[test]
fn rebases_onto_new_trunk() {
    let p = feature_behind_trunk();
    p.gw()
        .args(&["sync"])
        .passes()
        .stdout_has("Synced feature onto main")
        .stdout_has("Undo with: gw undo");

    assert_eq!(p.branch(), "feature");
    assert_eq!(p.read("trunk.txt"), "trunk\n");
    assert_eq!(p.read("feature.txt"), "feature\n");
    assert_eq!(p.git(&["rev-parse", "HEAD~1"]), p.git(&["rev-parse", "origin/main"]));
}

#[test]
fn branch_ahead_of_unchanged_trunk() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("feature.txt", "feature\n", "Feature work");
    let before = p.head();

    p.gw()
        .args(&["sync"])
        .passes()
        .stdout_has("Synced feature onto main")
        .stdout_lacks("Restored your uncommitted changes");

    assert_eq!(p.branch(), "feature");
    assert_eq!(p.head(), before);
    assert!(p.origin_has_branch("feature"));
    assert_eq!(p.git(&["stash", "list"]), "");
}

#[test]
fn fast_forwards_trunk() {
    let p = Project::with_origin();
    p.advance_trunk("trunk.txt", "trunk\n", "Trunk work");

    p.gw()
        .args(&["sync"])
        .passes()
        .stdout_has("Fast-forwarded main");

    assert_eq!(p.branch(), "main");
    assert_eq!(p.read("trunk.txt"), "trunk\n");
    assert_eq!(p.head(), p.git(&["rev-parse", "origin/main"]));
    p.gw()
        .args(&["history"])
        .passes()
        .stdout_has("Fast-forward main");
}

#[test]
fn pushes_the_branch() {
    let p = feature_behind_trunk();
    p.gw().args(&["sync"]).passes();
    assert!(p.origin_has_branch("feature"));
}

#[test]
fn updates_local_trunk() {
    let p = feature_behind_trunk();
    p.gw().args(&["sync"]).passes();
    assert_eq!(p.git(&["rev-parse", "main"]), p.git(&["rev-parse", "origin/main"]));
}

#[test]
fn keeps_uncommitted_changes() {
    let p = feature_behind_trunk();
    p.file("feature.txt", "feature\nwork in progress\n");
    p.file("scratch.txt", "notes\n");

    p.gw()
        .args(&["sync"])
        .passes()
        .stdout_has("Restored your uncommitted changes");

    assert_eq!(p.read("feature.txt"), "feature\nwork in progress\n");
    assert_eq!(p.read("scratch.txt"), "notes\n");
    assert_eq!(p.git(&["stash", "list"]), "");
}

#[test]
fn refuses_during_a_rebase() {
    let p = feature_behind_trunk();
    std::fs::create_dir_all(p.path().join(".git/rebase-merge")).unwrap();
    p.gw()
        .args(&["sync"])
        .fails()
        .stderr_has("already in progress");
}
