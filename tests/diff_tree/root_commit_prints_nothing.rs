use crate::common::command::{TwoCommits, run_difftree_command, two_commits};
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn root_commit_prints_nothing(two_commits: TwoCommits) {
    run_difftree_command(two_commits.path(), &["diff-tree", two_commits.root.as_ref()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[rstest]
fn root_commit_is_reported_at_info_level(two_commits: TwoCommits) {
    run_difftree_command(
        two_commits.path(),
        &["--log-level", "info", "diff-tree", two_commits.root.as_ref()],
    )
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("root commit"));
}
