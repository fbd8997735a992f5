use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use derive_new::new;
use std::sync::Arc;

/// The tree of one commit, read-only for as long as anyone holds it
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Snapshot {
    commit_oid: ObjectId,
    parents: Vec<ObjectId>,
    tree: Arc<Tree>,
}

impl Snapshot {
    pub fn commit_oid(&self) -> &ObjectId {
        &self.commit_oid
    }

    /// Only the first parent is ever compared against
    pub fn first_parent_oid(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

/// Where commits come from
///
/// Implementations own all I/O. `resolve_commit` accepts full-length ids only
/// and fails with `DiffError::CommitNotFound` for anything it cannot resolve.
pub trait CommitSource {
    fn resolve_commit(&self, identifier: &str) -> anyhow::Result<Snapshot>;

    /// `None` exactly when the commit is a root commit
    fn first_parent(&self, snapshot: &Snapshot) -> anyhow::Result<Option<Snapshot>>;
}
