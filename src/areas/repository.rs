use crate::areas::database::Database;
use crate::artifacts::diff::report::DiffReport;
use crate::artifacts::history::root_policy;
use crate::artifacts::history::snapshot::{CommitSource, Snapshot};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::DiffError;
use std::cell::{RefCell, RefMut};
use std::path::Path;

pub struct Repository {
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let objects_path = path.join(".git").join("objects");

        if !objects_path.is_dir() {
            return Err(anyhow::anyhow!(
                "Not a git repository: {} has no .git/objects",
                path.display()
            ));
        }

        Ok(Repository {
            writer: RefCell::new(writer),
            database: Database::new(objects_path.into_boxed_path()),
        })
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Diff the commit `identifier` against its first parent
    pub fn diff_commit(&self, identifier: &str) -> anyhow::Result<DiffReport> {
        root_policy::diff_commit(self, identifier)
    }

    fn load_snapshot(&self, oid: ObjectId) -> anyhow::Result<Snapshot> {
        let Some(commit) = self.database.parse_object_as_commit(&oid)? else {
            let object_type = self.database.get_object_type(&oid)?;
            tracing::warn!(%oid, %object_type, "object is not a commit");
            return Err(DiffError::CommitNotFound(oid.to_string()).into());
        };

        let tree = self.database.load_tree(commit.tree_oid())?;
        tracing::debug!(
            %oid,
            tree = %tree.oid(),
            parents = commit.parents().len(),
            "commit resolved"
        );

        Ok(Snapshot::new(oid, commit.parents().to_vec(), tree))
    }

    fn reject_abbreviation(&self, identifier: &str) -> anyhow::Error {
        let is_hex_prefix = !identifier.is_empty()
            && identifier.len() < OBJECT_ID_LENGTH
            && identifier.chars().all(|c| c.is_ascii_hexdigit());

        if is_hex_prefix {
            match self.database.find_objects_by_prefix(identifier) {
                Ok(candidates) => tracing::warn!(
                    identifier,
                    candidates = candidates.len(),
                    "abbreviated ids are not expanded; pass the full commit id"
                ),
                Err(error) => tracing::debug!(identifier, %error, "prefix search failed"),
            }
        }

        DiffError::CommitNotFound(identifier.to_string()).into()
    }
}

impl CommitSource for Repository {
    fn resolve_commit(&self, identifier: &str) -> anyhow::Result<Snapshot> {
        let Ok(oid) = ObjectId::try_parse(identifier.to_string()) else {
            return Err(self.reject_abbreviation(identifier));
        };

        if !self.database.contains(&oid) {
            tracing::debug!(%oid, "commit object missing");
            return Err(DiffError::CommitNotFound(identifier.to_string()).into());
        }

        self.load_snapshot(oid)
    }

    fn first_parent(&self, snapshot: &Snapshot) -> anyhow::Result<Option<Snapshot>> {
        snapshot
            .first_parent_oid()
            .map(|parent| {
                if !self.database.contains(parent) {
                    return Err(DiffError::CommitNotFound(parent.to_string()).into());
                }
                self.load_snapshot(parent.clone())
            })
            .transpose()
    }
}
