//! `gw clean`

use crate::prelude::*;

#[test]
fn nothing_to_clean() {
    let p = Project::with_origin();
    p.gw().args(&["clean"]).passes().stdout_has("Nothing to clean");
}

#[test]
fn dry_run_lists_without_deleting() {
    let p = Project::with_origin();
    p.git(&["branch", "landed"]);
    p.gw()
        .args(&["clean", "--dry-run"])
        .passes()
        .stdout_has("Would delete branch landed");
    assert_eq!(p.git(&["branch", "--list", "landed"]), "landed");
}

#[test]
fn deletes_merged_branch() {
    let p = Project::with_origin();
    p.git(&["branch", "landed"]);
    p.gw()
        .args(&["clean"])
        .passes()
        .stdout_has("Deleted branch landed");
    assert_eq!(p.git(&["branch", "--list", "landed"]), "");
}

#[test]
fn keeps_unmerged_branch() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "wip"]);
    p.commit("wip.txt", "wip\n", "Work in progress");
    p.git(&["checkout", "--quiet", "main"]);
    p.gw()
        .args(&["clean"])
        .passes()
        .stdout_lacks("wip")
        .stdout_has("Nothing to clean");
}

#[test]
fn keeps_current_branch() {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "current"]);
    p.gw().args(&["clean"]).passes().stdout_lacks("current");
}

#[test]
fn remote_flag_deletes_on_origin() {
    let p = Project::with_origin();
    p.git(&["branch", "landed"]);
    p.git(&["push", "--quiet", "origin", "landed"]);
    assert!(p.origin_has_branch("landed"));

    p.gw()
        .args(&["clean", "--remote"])
        .passes()
        .stdout_has("Deleted branch landed")
        .stdout_has("Deleted remote branch landed");
    assert!(!p.origin_has_branch("landed"));
}
