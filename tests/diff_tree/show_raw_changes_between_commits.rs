use crate::common::command::{TwoCommits, run_difftree_command, stdout_of, two_commits};
use difftree::artifacts::objects::object_id::NULL_OID_RAW;
use rstest::rstest;

#[rstest]
fn show_raw_changes_between_commits(
    two_commits: TwoCommits,
) -> Result<(), Box<dyn std::error::Error>> {
    let deleted = two_commits.file("a/b.txt").blob_oid();
    let old_main = two_commits.root_files[1].blob_oid();
    let new_main = two_commits.file("app/main.cfg").blob_oid();
    let inserted = two_commits.file("app/new.cfg").blob_oid();

    // unchanged docs/ is never listed; the rest follows tree order
    let expected_output = format!(
        "{head}\n\
         :100644 000000 {deleted} {NULL_OID_RAW} D\ta/b.txt\n\
         :100644 100644 {old_main} {new_main} M\tapp/main.cfg\n\
         :000000 100644 {NULL_OID_RAW} {inserted} A\tapp/new.cfg\n",
        head = two_commits.head,
    );

    let actual_output = stdout_of(&mut run_difftree_command(
        two_commits.path(),
        &["diff-tree", two_commits.head.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn repository_can_be_selected_with_a_path(
    two_commits: TwoCommits,
) -> Result<(), Box<dyn std::error::Error>> {
    let elsewhere = assert_fs::TempDir::new()?;
    let repository_path = two_commits.path().to_string_lossy().to_string();

    let actual_output = stdout_of(&mut run_difftree_command(
        elsewhere.path(),
        &[
            "-C",
            &repository_path,
            "diff-tree",
            "--name-only",
            "--no-commit-id",
            two_commits.head.as_ref(),
        ],
    ));

    pretty_assertions::assert_eq!(actual_output, "a/b.txt\napp/main.cfg\napp/new.cfg\n");

    Ok(())
}
