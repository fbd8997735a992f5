use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{Tree, TreeEntry, TreeListing};
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, btree_map};
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loose object store under `.git/objects`
///
/// Materialized trees are memoized by id, so commits that share a subtree
/// share one `Arc<Tree>` and the tree diff can prune on it.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    trees: RefCell<HashMap<ObjectId, Arc<Tree>>>,
}

// TODO: read packfiles; only loose objects are supported
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            trees: RefCell::new(HashMap::new()),
        }
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
            tracing::trace!(oid = %object_id, kind = %object.object_type(), "object stored");
        }

        Ok(object_id)
    }

    /// Store `tree` and every subtree below it
    pub fn store_tree(&self, tree: &Tree) -> anyhow::Result<ObjectId> {
        tree.traverse(&mut |subtree| self.store(subtree).map(|_| ()))?;

        Ok(tree.oid().clone())
    }

    pub fn parse_object_as_tree(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<Option<TreeListing>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(TreeListing::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Load the tree `object_id` with all of its subtrees
    ///
    /// Subtrees are read with an explicit stack, so nesting depth does not
    /// grow the call stack.
    pub fn load_tree(&self, object_id: &ObjectId) -> anyhow::Result<Arc<Tree>> {
        if let Some(tree) = self.cached_tree(object_id) {
            return Ok(tree);
        }

        let mut stack = vec![self.open_listing(object_id.clone())?];

        while let Some(frame) = stack.last_mut() {
            match frame.remaining.next() {
                Some((name, entry)) if entry.is_tree() => match self.cached_tree(&entry.oid) {
                    Some(tree) => {
                        frame.entries.insert(name, TreeEntry::Directory(tree));
                    }
                    None => {
                        let child = self.open_listing(entry.oid)?;
                        frame.waiting_on = Some(name);
                        stack.push(child);
                    }
                },
                Some((name, entry)) => {
                    frame.entries.insert(name, TreeEntry::File(entry));
                }
                None => {
                    let Some(done) = stack.pop() else { break };
                    let tree = Arc::new(Tree::from_parts(done.oid.clone(), done.entries));
                    self.trees
                        .borrow_mut()
                        .insert(done.oid, Arc::clone(&tree));

                    let Some(parent) = stack.last_mut() else {
                        return Ok(tree);
                    };
                    let name = parent
                        .waiting_on
                        .take()
                        .context("Subtree loaded without a parent entry")?;
                    parent.entries.insert(name, TreeEntry::Directory(tree));
                }
            }
        }

        Err(anyhow::anyhow!("Tree {object_id} could not be loaded"))
    }

    fn cached_tree(&self, object_id: &ObjectId) -> Option<Arc<Tree>> {
        self.trees.borrow().get(object_id).map(Arc::clone)
    }

    fn open_listing(&self, oid: ObjectId) -> anyhow::Result<PendingListing> {
        let listing = self
            .parse_object_as_tree(&oid)?
            .with_context(|| format!("Object {oid} is not a tree"))?;

        Ok(PendingListing {
            oid,
            remaining: listing.into_entries(),
            entries: BTreeMap::new(),
            waiting_on: None,
        })
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_path = self.path.join(object_id.to_path());
        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .with_context(|| format!("Corrupt object {object_id}"))?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose id starts with `prefix`
    ///
    /// Identifiers are never expanded to a full id; the candidates are only
    /// reported so that a rejected abbreviation can say how many it matched.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if !prefix.is_ascii() {
            return Ok(Vec::new());
        }

        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        let dirs = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dirs {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let full_oid = format!("{}{}", dir_name, file_name.to_string_lossy());

                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        Ok(matches)
    }
}

/// A stored tree whose subtrees are still being loaded
struct PendingListing {
    oid: ObjectId,
    remaining: btree_map::IntoIter<String, DatabaseEntry>,
    entries: BTreeMap<String, TreeEntry>,
    waiting_on: Option<String>,
}
