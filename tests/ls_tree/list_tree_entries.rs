use crate::common::command::{
    TwoCommits, repository_dir, run_difftree_command, stdout_of, two_commits,
};
use crate::common::file::files;
use crate::common::history::History;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn list_all_blobs_from_commit(two_commits: TwoCommits) -> Result<(), Box<dyn std::error::Error>> {
    let expected_output = format!(
        "100644 blob {}\tapp/main.cfg\n\
         100644 blob {}\tapp/new.cfg\n\
         100644 blob {}\tdocs/readme.txt\n",
        two_commits.file("app/main.cfg").blob_oid(),
        two_commits.file("app/new.cfg").blob_oid(),
        two_commits.file("docs/readme.txt").blob_oid(),
    );

    let actual_output = stdout_of(&mut run_difftree_command(
        two_commits.path(),
        &["ls-tree", "-r", two_commits.head.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn list_top_level_entries_of_commit(
    two_commits: TwoCommits,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(two_commits.path());
    let app = history.tree(&files(&[("main.cfg", "h3"), ("new.cfg", "h4")]));
    let docs = history.tree(&files(&[("readme.txt", "h1")]));

    let expected_output = format!("040000 tree {app}\tapp\n040000 tree {docs}\tdocs\n");
    let actual_output = stdout_of(&mut run_difftree_command(
        two_commits.path(),
        &["ls-tree", two_commits.head.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn list_tree_by_its_own_id(two_commits: TwoCommits) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(two_commits.path());
    let docs = history.tree(&files(&[("readme.txt", "h1")]));

    let expected_output = format!(
        "100644 blob {}\treadme.txt\n",
        two_commits.file("docs/readme.txt").blob_oid()
    );
    let actual_output = stdout_of(&mut run_difftree_command(
        two_commits.path(),
        &["ls-tree", docs.as_ref()],
    ));

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn listing_a_blob_fails(two_commits: TwoCommits) {
    let blob = two_commits.file("app/new.cfg").blob_oid();

    run_difftree_command(two_commits.path(), &["ls-tree", blob.as_ref()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a tree"));
}

#[rstest]
fn entries_follow_git_tree_order(
    repository_dir: assert_fs::TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(repository_dir.path());
    let commit_files = files(&[("a/inner.txt", "inner"), ("a.txt", "file"), ("a-b", "dash")]);
    let commit = history.commit(&[], &commit_files, "dotted names");
    let a = history.tree(&files(&[("inner.txt", "inner")]));
    let blob_oid = |path: &str| {
        commit_files
            .iter()
            .find(|file| file.path == path)
            .map(|file| file.blob_oid())
            .unwrap_or_else(|| panic!("no file {path}"))
    };

    let top_level = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["ls-tree", commit.as_ref()],
    ));
    pretty_assertions::assert_eq!(
        top_level,
        format!(
            "100644 blob {}\ta-b\n100644 blob {}\ta.txt\n040000 tree {a}\ta\n",
            blob_oid("a-b"),
            blob_oid("a.txt"),
        )
    );

    let recursive = stdout_of(&mut run_difftree_command(
        repository_dir.path(),
        &["ls-tree", "-r", commit.as_ref()],
    ));
    pretty_assertions::assert_eq!(
        recursive,
        format!(
            "100644 blob {}\ta-b\n100644 blob {}\ta.txt\n100644 blob {}\ta/inner.txt\n",
            blob_oid("a-b"),
            blob_oid("a.txt"),
            blob_oid("a/inner.txt"),
        )
    );

    Ok(())
}
