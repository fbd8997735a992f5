//! difftree
//!
//! Computes the file-level changes between two snapshots of a git tree. The
//! snapshots are walked side by side and identical subtrees are skipped by
//! content hash, so the work done is proportional to what changed.
//!
//! - `artifacts`: object types, the tree diff and commit snapshots
//! - `areas`: the loose-object database and the repository built on it
//! - `commands`: `diff-tree` and `ls-tree`
//! - `errors`: the `DiffError` conditions callers can match on
//! - `logging`: `tracing` subscriber setup

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
pub mod logging;

pub use artifacts::diff::change::{Action, ChangeEntry, DiffFilter};
pub use artifacts::diff::report::{DiffReport, DiffSummary, FileChange, diff, diff_trees};
pub use artifacts::history::root_policy::diff_commit;
pub use artifacts::history::snapshot::{CommitSource, Snapshot};
pub use errors::DiffError;

/// Line format of `diff-tree` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffOutputFormat {
    /// `:<old mode> <new mode> <old oid> <new oid> <status>\t<path>`
    #[default]
    Raw,
    /// `<status>\t<path>`
    NameStatus,
    /// `<path>`
    NameOnly,
}
