use crate::common::command::{repository_dir, run_difftree_command, stdout_of};
use crate::common::file::{FileSpec, files};
use crate::common::history::History;
use assert_fs::TempDir;
use difftree::artifacts::objects::object_id::NULL_OID_RAW;
use rstest::rstest;

#[rstest]
fn executable_bit_change_is_a_modification(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let script = FileSpec::new("bin/run.sh".to_string(), "#!/bin/sh\n".to_string());
    let parent = history.commit(&[], &[script.clone()], "Add script");
    let commit = history.commit(&[&parent], &[script.clone().executable()], "Make executable");

    let oid = script.blob_oid();
    let expected_output = format!(":100644 100755 {oid} {oid} M\tbin/run.sh\n");
    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", "--no-commit-id", commit.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn file_replaced_by_directory_is_delete_then_insert(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let old_files = files(&[("node", "leaf")]);
    let new_files = files(&[("node/child.txt", "child")]);
    let parent = history.commit(&[], &old_files, "File");
    let commit = history.commit(&[&parent], &new_files, "Directory");

    let expected_output = format!(
        ":100644 000000 {old} {NULL_OID_RAW} D\tnode\n\
         :000000 100644 {NULL_OID_RAW} {new} A\tnode/child.txt\n",
        old = old_files[0].blob_oid(),
        new = new_files[0].blob_oid(),
    );
    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", "--no-commit-id", commit.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn directory_replaced_by_file_deletes_every_leaf_first(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let parent = history.commit(
        &[],
        &files(&[("node/a.txt", "a"), ("node/deep/b.txt", "b")]),
        "Directory",
    );
    let commit = history.commit(&[&parent], &files(&[("node", "leaf")]), "File");

    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", "--name-status", "--no-commit-id", commit.as_ref()],
    ));

    pretty_assertions::assert_eq!(
        actual_output,
        "D\tnode/a.txt\nD\tnode/deep/b.txt\nA\tnode\n"
    );

    Ok(())
}

#[rstest]
fn large_unchanged_directory_is_skipped(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let mut snapshot = crate::common::file::write_generated_files("vendor", 50);
    snapshot.push(FileSpec::new("version.txt".to_string(), "1".to_string()));
    let parent = history.commit(&[], &snapshot, "Vendor everything");

    snapshot.pop();
    snapshot.push(FileSpec::new("version.txt".to_string(), "2".to_string()));
    let commit = history.commit(&[&parent], &snapshot, "Bump version");

    let actual_output = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["diff-tree", "--name-only", "--no-commit-id", commit.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, "version.txt\n");

    Ok(())
}
