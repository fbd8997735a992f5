//! Caller-visible diff results
//!
//! The tree diff yields raw change entries; this turns them into the ordered
//! `(path, action)` list handed back to callers. Order is the walk order of
//! the tree diff and is never re-sorted.

use crate::artifacts::diff::change::{Action, ChangeEntry, DiffFilter};
use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::history::snapshot::Snapshot;
use crate::artifacts::objects::tree::Tree;
use crate::errors::DiffError;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FileChange {
    pub path: String,
    pub action: Action,
}

/// Classified changes, in walk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    changes: Vec<(FileChange, ChangeEntry)>,
}

impl DiffReport {
    /// Classify every entry; the first malformed one fails the whole report
    pub fn assemble(change_set: Vec<ChangeEntry>) -> Result<Self, DiffError> {
        let changes = change_set
            .into_iter()
            .map(|entry| {
                let file_change = FileChange::new(entry.path()?.to_string(), entry.classify()?);
                Ok((file_change, entry))
            })
            .collect::<Result<Vec<_>, DiffError>>()?;

        Ok(DiffReport { changes })
    }

    /// Keep only the actions selected by `filter`
    pub fn filtered(self, filter: DiffFilter) -> Self {
        DiffReport {
            changes: self
                .changes
                .into_iter()
                .filter(|(file_change, _)| file_change.action.matches_filter(filter))
                .collect(),
        }
    }

    pub fn file_changes(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter().map(|(file_change, _)| file_change)
    }

    /// File changes together with the entries they were classified from
    pub fn entries(&self) -> impl Iterator<Item = (&FileChange, &ChangeEntry)> {
        self.changes.iter().map(|(file_change, entry)| (file_change, entry))
    }

    pub fn into_file_changes(self) -> Vec<FileChange> {
        self.changes
            .into_iter()
            .map(|(file_change, _)| file_change)
            .collect()
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary::from_changes(self.file_changes())
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Per-action counts of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub inserted: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl DiffSummary {
    pub fn from_changes<'c>(changes: impl IntoIterator<Item = &'c FileChange>) -> Self {
        changes
            .into_iter()
            .fold(DiffSummary::default(), |mut summary, change| {
                match change.action {
                    Action::Insert => summary.inserted += 1,
                    Action::Delete => summary.deleted += 1,
                    Action::Modify => summary.modified += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.inserted + self.deleted + self.modified
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = if self.total() == 1 { "file" } else { "files" };
        write!(
            f,
            "{} {} changed, {} inserted, {} deleted, {} modified",
            self.total(),
            noun,
            self.inserted,
            self.deleted,
            self.modified
        )
    }
}

/// Diff two trees into a report
pub fn diff_trees(old: &Tree, new: &Tree) -> Result<DiffReport, DiffError> {
    let mut tree_diff = TreeDiff::new(old, new);
    let report = DiffReport::assemble(tree_diff.changes())?;

    tracing::debug!(
        old = %old.oid(),
        new = %new.oid(),
        changes = report.len(),
        pruned = tree_diff.pruned(),
        "trees compared"
    );

    Ok(report)
}

/// Diff two snapshots into the ordered `(path, action)` list
pub fn diff(old: &Snapshot, new: &Snapshot) -> Result<Vec<FileChange>, DiffError> {
    Ok(diff_trees(old.tree(), new.tree())?.into_file_changes())
}
