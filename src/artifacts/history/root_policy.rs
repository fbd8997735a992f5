//! Root commit handling
//!
//! A commit is diffed against its first parent. A root commit has none, and
//! diffing it against nothing is undefined, so it ends in
//! `DiffError::RootCommitNoComparison` instead of a result. Merge commits'
//! other parents are ignored.

use crate::artifacts::diff::report::{DiffReport, diff_trees};
use crate::artifacts::history::snapshot::{CommitSource, Snapshot};
use crate::errors::DiffError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentState {
    HasPredecessor(Snapshot),
    NoPredecessor,
}

impl ParentState {
    pub fn resolve<S>(source: &S, commit: &Snapshot) -> anyhow::Result<Self>
    where
        S: CommitSource + ?Sized,
    {
        match source.first_parent(commit)? {
            Some(parent) => Ok(ParentState::HasPredecessor(parent)),
            None => Ok(ParentState::NoPredecessor),
        }
    }
}

/// A commit and the snapshot it is compared against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub parent: Snapshot,
    pub commit: Snapshot,
}

impl Comparison {
    /// Resolve `identifier` and pair it with its first parent
    pub fn resolve<S>(source: &S, identifier: &str) -> anyhow::Result<Self>
    where
        S: CommitSource + ?Sized,
    {
        let commit = source.resolve_commit(identifier)?;

        match ParentState::resolve(source, &commit)? {
            ParentState::HasPredecessor(parent) => {
                tracing::debug!(
                    commit = %commit.commit_oid(),
                    parent = %parent.commit_oid(),
                    "comparing against first parent"
                );
                Ok(Comparison { parent, commit })
            }
            ParentState::NoPredecessor => {
                tracing::info!(commit = %commit.commit_oid(), "root commit, nothing to compare");
                Err(DiffError::RootCommitNoComparison(commit.commit_oid().clone()).into())
            }
        }
    }

    pub fn diff(&self) -> Result<DiffReport, DiffError> {
        diff_trees(self.parent.tree(), self.commit.tree())
    }
}

/// Diff the commit named by `identifier` against its first parent
pub fn diff_commit<S>(source: &S, identifier: &str) -> anyhow::Result<DiffReport>
where
    S: CommitSource + ?Sized,
{
    let comparison = Comparison::resolve(source, identifier)?;

    Ok(comparison.diff()?)
}
