//! `gw sync` stopping on conflicts, then `--continue` or `--abort`

use crate::prelude::*;

fn conflicting() -> Project {
    let p = Project::with_origin();
    p.git(&["checkout", "--quiet", "-b", "feature"]);
    p.commit("README.md", "# Feature\n", "Feature readme");
    p.advance_trunk("README.md", "# Trunk\n", "Trunk readme");
    p
}

#[test]
fn pauses_with_instructions() {
    let p = conflicting();
    p.gw()
        .args(&["sync"])
        .fails()
        .stderr_has("Sync paused on conflicts")
        .stderr_has("gw sync --continue")
        .stderr_has("gw sync --abort");
}

#[test]
fn abort_restores_the_branch() {
    let p = conflicting();
    let before = p.head();
    p.gw().args(&["sync"]).fails();

    p.gw()
        .args(&["sync", "--abort"])
        .passes()
        .stdout_has("Aborted rebase");

    assert_eq!(p.branch(), "feature");
    assert_eq!(p.head(), before);
    assert_eq!(p.read("README.md"), "# Feature\n");
}

#[test]
fn continue_finishes_the_sync() {
    let p = conflicting();
    p.gw().args(&["sync"]).fails();

    p.file("README.md", "# Trunk\n# Feature\n");
    p.git(&["add", "README.md"]);
    p.gw()
        .args(&["sync", "--continue"])
        .passes()
        .stdout_has("Finished sync of feature");

    assert_eq!(p.branch(), "feature");
    assert_eq!(p.read("README.md"), "# Trunk\n# Feature\n");
    assert!(p.origin_has_branch("feature"));
    p.gw()
        .args(&["history"])
        .passes()
        .stdout_has("Sync feature (continued)");
}

#[test]
fn stash_is_kept_while_paused() {
    let p = conflicting();
    p.file("notes.txt", "draft\n");
    p.gw().args(&["sync"]).fails().stderr_has("gw-sync-");
    assert!(p.git(&["stash", "list"]).contains("gw-sync-"));
}

#[test]
fn abort_restores_stashed_changes() {
    let p = conflicting();
    p.file("notes.txt", "draft\n");
    p.gw().args(&["sync"]).fails();
    assert!(!p.path().join("notes.txt").exists());

    p.gw()
        .args(&["sync", "--abort"])
        .passes()
        .stdout_has("Aborted rebase")
        .stdout_has("Restored your uncommitted changes");

    assert_eq!(p.read("notes.txt"), "draft\n");
    assert_eq!(p.git(&["stash", "list"]), "");
}

#[test]
fn continue_leaves_stashes_of_earlier_runs() {
    let p = conflicting();
    p.git(&["checkout", "--quiet", "main"]);
    p.file("notes.txt", "draft\n");
    p.git(&["stash", "push", "--quiet", "--include-untracked", "-m", "gw-sync-op-old"]);
    p.git(&["checkout", "--quiet", "feature"]);
    p.gw().args(&["sync"]).fails();

    p.file("README.md", "# Trunk\n# Feature\n");
    p.git(&["add", "README.md"]);
    p.gw()
        .args(&["sync", "--continue"])
        .passes()
        .stdout_lacks("Restored your uncommitted changes");

    assert!(!p.path().join("notes.txt").exists());
    assert!(p.git(&["stash", "list"]).contains("gw-sync-op-old"));
}
