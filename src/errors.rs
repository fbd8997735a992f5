//! Error types for tree diffing
//!
//! Infrastructure failures (I/O, corrupt objects) travel as `anyhow::Error`.
//! The conditions a caller is expected to tell apart are variants of
//! `DiffError`; once wrapped in `anyhow::Error` they are recovered with
//! `downcast_ref::<DiffError>()`.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The identifier does not name a commit in the repository. Abbreviated
    /// ids land here too: they are never expanded.
    #[error("commit {0} not found")]
    CommitNotFound(String),

    /// The commit has no parent, so there is nothing to compare it against
    #[error("commit {0} is a root commit and has no parent to diff against")]
    RootCommitNoComparison(ObjectId),

    /// A change with neither an old nor a new side. Only a defect in the tree
    /// diff can produce one.
    #[error("malformed change: empty from and to")]
    MalformedChangeEntry,
}

impl DiffError {
    /// Whether the error means "no diff possible" rather than a failure
    pub fn is_root_commit(&self) -> bool {
        matches!(self, DiffError::RootCommitNoComparison(_))
    }
}
