//! Merge-join diff of two trees
//!
//! Both trees list their entries in byte-wise name order, so each directory
//! level is compared by walking the two listings in lock-step:
//!
//! - a name only on the old side deletes every leaf under it
//! - a name only on the new side inserts every leaf under it
//! - two directories with the same id are skipped without being opened
//! - two directories with different ids are compared recursively
//! - two leaves with different id or mode are a modification
//! - a leaf replaced by a directory (or the reverse) is never a modification:
//!   every old leaf is deleted, then every new leaf is inserted
//!
//! Changes come out depth-first, in the order the walk meets them. The walk
//! keeps its own stack, so deep trees do not grow the call stack.

use crate::artifacts::diff::change::ChangeEntry;
use crate::artifacts::objects::tree::{Tree, TreeEntry, join_path};
use std::collections::BTreeMap;
use std::collections::btree_map::Iter;
use std::iter::Peekable;

static EMPTY_LISTING: BTreeMap<String, TreeEntry> = BTreeMap::new();

type Listing<'t> = Peekable<Iter<'t, String, TreeEntry>>;

/// Pair of directory listings being merged at one level
struct Level<'t> {
    prefix: String,
    old: Listing<'t>,
    new: Listing<'t>,
}

impl<'t> Level<'t> {
    fn new(prefix: String, old: Option<&'t Tree>, new: Option<&'t Tree>) -> Self {
        let listing = |tree: Option<&'t Tree>| {
            tree.map_or(&EMPTY_LISTING, Tree::entry_map)
                .iter()
                .peekable()
        };

        Level {
            prefix,
            old: listing(old),
            new: listing(new),
        }
    }
}

enum Step<'t> {
    Merge(Level<'t>),
    /// A change held back until the levels pushed above it are exhausted
    Emit(ChangeEntry),
}

/// Outcome of advancing the merge-join by one name
enum Joined<'t> {
    Removed(&'t String, &'t TreeEntry),
    Added(&'t String, &'t TreeEntry),
    Matched(&'t String, &'t TreeEntry, &'t TreeEntry),
}

#[derive(Debug)]
pub struct TreeDiff<'t> {
    old: &'t Tree,
    new: &'t Tree,
    pruned: usize,
}

impl<'t> TreeDiff<'t> {
    pub fn new(old: &'t Tree, new: &'t Tree) -> Self {
        TreeDiff { old, new, pruned: 0 }
    }

    /// Number of unchanged subtrees skipped by the last `changes` call
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    pub fn changes(&mut self) -> Vec<ChangeEntry> {
        let mut change_set = Vec::new();
        self.pruned = 0;

        if self.old.oid() == self.new.oid() {
            return change_set;
        }

        let mut stack = vec![Step::Merge(Level::new(
            String::new(),
            Some(self.old),
            Some(self.new),
        ))];

        while let Some(step) = stack.pop() {
            let mut level = match step {
                Step::Emit(change) => {
                    change_set.push(change);
                    continue;
                }
                Step::Merge(level) => level,
            };

            let Some(joined) = Self::join_next(&mut level) else {
                continue;
            };

            let prefix = level.prefix.clone();
            // the current level goes back under whatever this name pushes
            stack.push(Step::Merge(level));

            match joined {
                Joined::Removed(name, entry) => {
                    let path = join_path(&prefix, name);
                    Self::detect_deletion(path, entry, &mut stack, &mut change_set)
                }
                Joined::Added(name, entry) => {
                    let path = join_path(&prefix, name);
                    Self::detect_addition(path, entry, &mut stack, &mut change_set)
                }
                Joined::Matched(name, old, new) => self.detect_modification(
                    join_path(&prefix, name),
                    old,
                    new,
                    &mut stack,
                    &mut change_set,
                ),
            }
        }

        tracing::trace!(
            changes = change_set.len(),
            pruned = self.pruned,
            "tree diff finished"
        );

        change_set
    }

    fn join_next(level: &mut Level<'t>) -> Option<Joined<'t>> {
        let order = match (level.old.peek(), level.new.peek()) {
            (None, None) => return None,
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some((old_name, _)), Some((new_name, _))) => {
                old_name.as_bytes().cmp(new_name.as_bytes())
            }
        };

        match order {
            std::cmp::Ordering::Less => {
                let (name, entry) = level.old.next()?;
                Some(Joined::Removed(name, entry))
            }
            std::cmp::Ordering::Greater => {
                let (name, entry) = level.new.next()?;
                Some(Joined::Added(name, entry))
            }
            std::cmp::Ordering::Equal => {
                let (name, old) = level.old.next()?;
                let (_, new) = level.new.next()?;
                Some(Joined::Matched(name, old, new))
            }
        }
    }

    fn detect_deletion(
        path: String,
        entry: &'t TreeEntry,
        stack: &mut Vec<Step<'t>>,
        change_set: &mut Vec<ChangeEntry>,
    ) {
        match entry {
            TreeEntry::File(file) => change_set.push(ChangeEntry::deleted(path, file.clone())),
            TreeEntry::Directory(tree) => {
                stack.push(Step::Merge(Level::new(path, Some(tree.as_ref()), None)))
            }
        }
    }

    fn detect_addition(
        path: String,
        entry: &'t TreeEntry,
        stack: &mut Vec<Step<'t>>,
        change_set: &mut Vec<ChangeEntry>,
    ) {
        match entry {
            TreeEntry::File(file) => change_set.push(ChangeEntry::inserted(path, file.clone())),
            TreeEntry::Directory(tree) => {
                stack.push(Step::Merge(Level::new(path, None, Some(tree.as_ref()))))
            }
        }
    }

    fn detect_modification(
        &mut self,
        path: String,
        old: &'t TreeEntry,
        new: &'t TreeEntry,
        stack: &mut Vec<Step<'t>>,
        change_set: &mut Vec<ChangeEntry>,
    ) {
        match (old, new) {
            (TreeEntry::Directory(old_tree), TreeEntry::Directory(new_tree)) => {
                if old_tree.oid() == new_tree.oid() {
                    tracing::trace!(%path, oid = %old_tree.oid(), "unchanged subtree pruned");
                    self.pruned += 1;
                } else {
                    let level = Level::new(path, Some(old_tree.as_ref()), Some(new_tree.as_ref()));
                    stack.push(Step::Merge(level));
                }
            }
            (TreeEntry::File(old_file), TreeEntry::File(new_file)) => {
                if old_file != new_file {
                    let change = ChangeEntry::modified(path, old_file.clone(), new_file.clone());
                    change_set.push(change);
                }
            }
            (TreeEntry::File(old_file), TreeEntry::Directory(new_tree)) => {
                change_set.push(ChangeEntry::deleted(path.clone(), old_file.clone()));
                stack.push(Step::Merge(Level::new(path, None, Some(new_tree.as_ref()))));
            }
            (TreeEntry::Directory(old_tree), TreeEntry::File(new_file)) => {
                // the insert must follow every delete from the old subtree
                stack.push(Step::Emit(ChangeEntry::inserted(path.clone(), new_file.clone())));
                stack.push(Step::Merge(Level::new(path, Some(old_tree.as_ref()), None)));
            }
        }
    }
}
