//! Tree object
//!
//! Trees are immutable directory snapshots. Each entry maps a name to a blob
//! (a leaf) or to a nested tree, and the tree's id is the SHA-1 of its git
//! serialization. A directory's id therefore covers every descendant: equal
//! ids mean equal subtrees, which is what lets the tree diff prune.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Ordering
//!
//! `entries()` yields names in byte-wise order. The serialized form follows
//! git instead, where a directory sorts as if its name ended in `/`, so that
//! computed ids agree with git's.
//!
//! There are two tree types: `TreeListing` is one stored tree object as read
//! from the database (names to ids), `Tree` is a fully materialized snapshot
//! whose directory entries own their subtrees.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame_object};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::collections::btree_map::{self, Entry};
use std::io::{BufRead, Write};
use std::sync::Arc;

pub const EMPTY_TREE_OID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Entry of a materialized tree
#[derive(Debug, Clone)]
pub enum TreeEntry {
    /// Leaf entry (blob, symlink or gitlink)
    File(DatabaseEntry),
    /// Directory entry owning its subtree
    Directory(Arc<Tree>),
}

impl TreeEntry {
    pub fn oid(&self) -> &ObjectId {
        match self {
            TreeEntry::File(entry) => &entry.oid,
            TreeEntry::Directory(tree) => tree.oid(),
        }
    }

    pub fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::File(entry) => entry.mode,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    pub fn as_tree(&self) -> Option<&Arc<Tree>> {
        match self {
            TreeEntry::Directory(tree) => Some(tree),
            TreeEntry::File(_) => None,
        }
    }
}

impl PartialEq for TreeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.mode() == other.mode() && self.oid() == other.oid()
    }
}

impl Eq for TreeEntry {}

/// Immutable, fully materialized tree snapshot
#[derive(Debug, Clone)]
pub struct Tree {
    oid: ObjectId,
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Create a tree from its direct entries, computing its id
    pub fn from_entries(entries: BTreeMap<String, TreeEntry>) -> anyhow::Result<Self> {
        for name in entries.keys() {
            validate_name(name)?;
        }

        let content = serialize_entries(
            entries
                .iter()
                .map(|(name, entry)| (name.as_str(), entry.mode(), entry.oid())),
        )?;
        let oid = TreeHeader(&content).object_id()?;

        Ok(Tree { oid, entries })
    }

    /// Assemble a tree whose id is already known (read from the database)
    pub(crate) fn from_parts(oid: ObjectId, entries: BTreeMap<String, TreeEntry>) -> Self {
        Tree { oid, entries }
    }

    /// Build a nested tree from flat `dir/sub/file` paths
    ///
    /// Intermediate directories are created as needed. A path that is used
    /// both as a file and as a directory is rejected, as is a directory mode
    /// on a leaf.
    pub fn build<I, P>(files: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (P, DatabaseEntry)>,
        P: AsRef<str>,
    {
        let mut root = PendingTree::default();

        for (path, entry) in files {
            root.insert(path.as_ref(), entry)?;
        }

        root.freeze()
    }

    /// Content hash of the tree
    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    /// Direct entries, sorted byte-wise by name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &TreeEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub(crate) fn entry_map(&self) -> &BTreeMap<String, TreeEntry> {
        &self.entries
    }

    /// Nested tree of the directory entry `name`
    pub fn child_tree(&self, name: &str) -> Option<&Arc<Tree>> {
        self.entries.get(name).and_then(TreeEntry::as_tree)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct entries in git's tree order, where a directory sorts as `name/`
    pub fn entries_in_git_order(&self) -> Vec<(&str, &TreeEntry)> {
        let mut entries = self.entries().collect::<Vec<_>>();
        entries.sort_by(|(a, a_entry), (b, b_entry)| {
            git_sort_key(a, a_entry.mode()).cmp(git_sort_key(b, b_entry.mode()))
        });
        entries
    }

    /// Every leaf under this tree with its full path, in path order
    pub fn leaves(&self) -> Vec<(String, DatabaseEntry)> {
        self.collect_leaves(|tree| tree.entries().collect())
    }

    /// Every leaf under this tree in the order `git ls-tree -r` prints them
    pub fn leaves_in_git_order(&self) -> Vec<(String, DatabaseEntry)> {
        self.collect_leaves(Tree::entries_in_git_order)
    }

    fn collect_leaves<'t>(
        &'t self,
        order: impl Fn(&'t Tree) -> Vec<(&'t str, &'t TreeEntry)>,
    ) -> Vec<(String, DatabaseEntry)> {
        let mut leaves = Vec::new();
        let mut stack = vec![(String::new(), order(self).into_iter())];

        while let Some((prefix, iter)) = stack.last_mut() {
            let Some((name, entry)) = iter.next() else {
                stack.pop();
                continue;
            };

            let path = join_path(prefix, name);
            match entry {
                TreeEntry::File(file) => leaves.push((path, file.clone())),
                TreeEntry::Directory(tree) => stack.push((path, order(tree.as_ref()).into_iter())),
            }
        }

        leaves
    }

    /// Visit this tree and all subtrees, children before parents
    ///
    /// Storing needs this order: a parent refers to its children by id.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        let mut stack = vec![(self, self.entries.values())];

        while let Some((tree, children)) = stack.last_mut() {
            match children.next() {
                Some(TreeEntry::Directory(child)) => {
                    let child = child.as_ref();
                    stack.push((child, child.entries.values()));
                }
                Some(TreeEntry::File(_)) => {}
                None => {
                    let tree = *tree;
                    stack.pop();
                    func(tree)?;
                }
            }
        }

        Ok(())
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.oid == other.oid
    }
}

impl Eq for Tree {}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content = serialize_entries(
            self.entries
                .iter()
                .map(|(name, entry)| (name.as_str(), entry.mode(), entry.oid())),
        )?;

        Ok(frame_object(ObjectType::Tree, &content))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, entry)| display_entry(name, entry.mode(), entry.oid()))
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        Ok(self.oid.clone())
    }
}

/// One stored tree object: names mapped to the ids they point at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeListing {
    entries: BTreeMap<String, DatabaseEntry>,
}

impl TreeListing {
    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> btree_map::IntoIter<String, DatabaseEntry> {
        self.entries.into_iter()
    }
}

impl Unpackable for TreeListing {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(anyhow::anyhow!("unexpected EOF in mode"));
            }

            let mode = EntryMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(anyhow::anyhow!("unexpected EOF in name"));
            }
            // names are arbitrary bytes; undecodable ones are shown lossily
            let name = String::from_utf8_lossy(&name_bytes).into_owned();

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            if entries.insert(name, DatabaseEntry::new(oid, mode)).is_some() {
                return Err(anyhow::anyhow!(
                    "duplicate entry name {:?}",
                    String::from_utf8_lossy(&name_bytes)
                ));
            }
        }

        Ok(TreeListing { entries })
    }
}

/// Join a tree-relative prefix and an entry name with `/`
pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

pub(crate) fn display_entry(name: &str, mode: EntryMode, oid: &ObjectId) -> String {
    let object_type = if mode.is_tree() {
        ObjectType::Tree
    } else {
        ObjectType::Blob
    };

    format!(
        "{} {} {}\t{}",
        mode.as_padded_str(),
        object_type,
        oid.as_ref(),
        name
    )
}

fn validate_name(name: &str) -> anyhow::Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
        return Err(anyhow::anyhow!("Invalid tree entry name {name:?}"));
    }

    Ok(())
}

fn serialize_entries<'e>(
    entries: impl Iterator<Item = (&'e str, EntryMode, &'e ObjectId)>,
) -> anyhow::Result<Vec<u8>> {
    let mut entries = entries.collect::<Vec<_>>();
    entries.sort_by(|(a, a_mode, _), (b, b_mode, _)| {
        git_sort_key(a, *a_mode).cmp(git_sort_key(b, *b_mode))
    });

    let mut content = Vec::new();
    for (name, mode, oid) in entries {
        write!(content, "{:o} {}", mode.as_u32(), name)?;
        content.push(0);
        oid.write_h40_to(&mut content)?;
    }

    Ok(content)
}

fn git_sort_key(name: &str, mode: EntryMode) -> impl Iterator<Item = u8> + '_ {
    let suffix = mode.is_tree().then_some(b'/');
    name.bytes().chain(suffix)
}

/// Hashes pre-serialized tree content without materializing a `Tree`
struct TreeHeader<'c>(&'c [u8]);

impl Packable for TreeHeader<'_> {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(frame_object(ObjectType::Tree, self.0))
    }
}

impl Object for TreeHeader<'_> {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        String::new()
    }
}

#[derive(Debug, Default)]
struct PendingTree {
    entries: BTreeMap<String, PendingEntry>,
}

#[derive(Debug)]
enum PendingEntry {
    File(DatabaseEntry),
    Directory(PendingTree),
}

impl PendingTree {
    fn insert(&mut self, path: &str, entry: DatabaseEntry) -> anyhow::Result<()> {
        if entry.is_tree() {
            return Err(anyhow::anyhow!(
                "{path}: directories are created from nested paths, not listed"
            ));
        }

        let mut components = path.split('/').peekable();
        let mut node = self;

        while let Some(name) = components.next() {
            validate_name(name).with_context(|| format!("Invalid path {path:?}"))?;

            if components.peek().is_none() {
                return match node.entries.entry(name.to_string()) {
                    Entry::Vacant(slot) => {
                        slot.insert(PendingEntry::File(entry));
                        Ok(())
                    }
                    Entry::Occupied(_) => Err(anyhow::anyhow!(
                        "{path}: listed twice or already used as a directory"
                    )),
                };
            }

            let child = node
                .entries
                .entry(name.to_string())
                .or_insert_with(|| PendingEntry::Directory(PendingTree::default()));
            node = match child {
                PendingEntry::Directory(tree) => tree,
                PendingEntry::File(_) => {
                    return Err(anyhow::anyhow!("{path}: parent {name} is a file"));
                }
            };
        }

        Err(anyhow::anyhow!("Invalid path {path:?}"))
    }

    fn freeze(self) -> anyhow::Result<Tree> {
        let entries = self
            .entries
            .into_iter()
            .map(|(name, pending)| {
                let entry = match pending {
                    PendingEntry::File(file) => TreeEntry::File(file),
                    PendingEntry::Directory(tree) => TreeEntry::Directory(Arc::new(tree.freeze()?)),
                };
                Ok((name, entry))
            })
            .collect::<anyhow::Result<BTreeMap<_, _>>>()?;

        Tree::from_entries(entries)
    }
}
