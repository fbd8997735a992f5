use crate::common::command::{repository_dir, run_difftree_command, stdout_of};
use crate::common::file::files;
use crate::common::history::History;
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn merge_commit_is_compared_with_first_parent(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let base = history.commit(&[], &files(&[("shared.txt", "base")]), "Base");
    let main = history.commit(
        &[&base],
        &files(&[("shared.txt", "base"), ("main.txt", "main")]),
        "Work on main",
    );
    let topic = history.commit(
        &[&base],
        &files(&[("shared.txt", "base"), ("topic.txt", "topic")]),
        "Work on topic",
    );
    let merge = history.commit(
        &[&main, &topic],
        &files(&[
            ("shared.txt", "base"),
            ("main.txt", "main"),
            ("topic.txt", "topic"),
        ]),
        "Merge topic",
    );

    // only what the merge brought in relative to main
    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", "--name-status", "--no-commit-id", merge.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, "A\ttopic.txt\n");

    Ok(())
}
