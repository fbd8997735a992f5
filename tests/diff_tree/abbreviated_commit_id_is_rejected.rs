use crate::common::command::{TwoCommits, run_difftree_command, two_commits};
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn abbreviated_commit_id_is_rejected(two_commits: TwoCommits) {
    let abbreviated = two_commits.head.to_short_oid();

    run_difftree_command(two_commits.path(), &["diff-tree", &abbreviated])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(format!("commit {abbreviated} not found")));
}

#[rstest]
fn abbreviation_warning_counts_candidates(two_commits: TwoCommits) {
    let abbreviated = two_commits.head.to_short_oid();

    run_difftree_command(two_commits.path(), &["diff-tree", &abbreviated])
        .assert()
        .failure()
        .stderr(predicate::str::contains("candidates=1"));
}

#[rstest]
fn unknown_commit_is_not_found(two_commits: TwoCommits) {
    let missing = "0123456789abcdef0123456789abcdef01234567";

    run_difftree_command(two_commits.path(), &["diff-tree", missing])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("commit {missing} not found")));
}

#[rstest]
fn tree_id_is_not_a_commit(two_commits: TwoCommits) -> Result<(), Box<dyn std::error::Error>> {
    let history = crate::common::history::History::open(two_commits.path());
    let tree = history.tree(&two_commits.head_files);

    run_difftree_command(two_commits.path(), &["diff-tree", tree.as_ref()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    Ok(())
}
