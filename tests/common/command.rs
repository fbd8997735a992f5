use crate::common::file::{FileSpec, files};
use crate::common::history::History;
use assert_cmd::Command;
use assert_fs::TempDir;
use difftree::artifacts::objects::object_id::ObjectId;
use rstest::fixture;
use std::path::Path;

/// A repository with a root commit and one commit on top of it
pub struct TwoCommits {
    pub dir: TempDir,
    pub root: ObjectId,
    pub head: ObjectId,
    pub root_files: Vec<FileSpec>,
    pub head_files: Vec<FileSpec>,
}

impl TwoCommits {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, path: &str) -> &FileSpec {
        self.head_files
            .iter()
            .chain(self.root_files.iter())
            .find(|file| file.path == path)
            .unwrap_or_else(|| panic!("No file {path} in the scenario"))
    }
}

#[fixture]
pub fn repository_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    History::open(dir.path());
    dir
}

#[fixture]
pub fn two_commits(repository_dir: TempDir) -> TwoCommits {
    let history = History::open(repository_dir.path());

    let root_files = files(&[
        ("docs/readme.txt", "h1"),
        ("app/main.cfg", "h2"),
        ("a/b.txt", "gone soon"),
    ]);
    let head_files = files(&[
        ("docs/readme.txt", "h1"),
        ("app/main.cfg", "h3"),
        ("app/new.cfg", "h4"),
    ]);

    let root = history.commit(&[], &root_files, "Initial commit");
    let head = history.commit(&[&root], &head_files, "Second commit");

    TwoCommits {
        dir: repository_dir,
        root,
        head,
        root_files,
        head_files,
    }
}

pub fn run_difftree_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("difftree").expect("Failed to find difftree binary");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("DIFFTREE_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout is not UTF-8")
}
