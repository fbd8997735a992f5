use crate::common::command::{repository_dir, run_difftree_command, stdout_of};
use crate::common::file::files;
use crate::common::history::History;
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn show_name_status_for_modified_and_inserted_files(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let parent = history.commit(
        &[],
        &files(&[("docs/readme.txt", "h1"), ("app/main.cfg", "h2")]),
        "Initial commit",
    );
    let commit = history.commit(
        &[&parent],
        &files(&[
            ("docs/readme.txt", "h1"),
            ("app/main.cfg", "h3"),
            ("app/new.cfg", "h4"),
        ]),
        "Configure app",
    );

    let expected_output = format!("{commit}\nM\tapp/main.cfg\nA\tapp/new.cfg\n");
    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", "--name-status", commit.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn show_deleted_directory_contents_without_commit_id(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let parent = history.commit(&[], &files(&[("a/b.txt", "h1")]), "Initial commit");
    let commit = history.commit(&[&parent], &[], "Remove everything");

    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", "--name-status", "--no-commit-id", commit.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, "D\ta/b.txt\n");

    Ok(())
}

#[rstest]
fn identical_trees_print_nothing(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let snapshot = files(&[("src/lib.rs", "pub mod x;"), ("README.md", "readme")]);
    let parent = history.commit(&[], &snapshot, "Initial commit");
    let commit = history.commit(&[&parent], &snapshot, "Empty commit");

    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", commit.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, "");

    Ok(())
}
