//! Change entries and their classification
//!
//! The tree diff emits a `ChangeEntry` per differing leaf: the old side, the
//! new side, or both. The `Action` is never stored; it is derived from which
//! sides are present.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::DiffError;
use bitflags::bitflags;
use derive_new::new;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DiffFilter: u32 {
        const ADDED = 0b0001;
        const DELETED = 0b0010;
        const MODIFIED = 0b0100;
    }
}

impl DiffFilter {
    /// Parse a `--diff-filter` value such as `AD` or `M`
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c {
                'A' => filter |= Self::ADDED,
                'D' => filter |= Self::DELETED,
                'M' => filter |= Self::MODIFIED,
                _ => return None,
            }
        }

        Some(filter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Insert,
    Delete,
    Modify,
}

impl Action {
    pub fn status_char(&self) -> char {
        match self {
            Action::Insert => 'A',
            Action::Delete => 'D',
            Action::Modify => 'M',
        }
    }

    pub fn matches_filter(&self, filter: DiffFilter) -> bool {
        match self {
            Action::Insert => filter.contains(DiffFilter::ADDED),
            Action::Delete => filter.contains(DiffFilter::DELETED),
            Action::Modify => filter.contains(DiffFilter::MODIFIED),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Insert => "Insert",
            Action::Delete => "Delete",
            Action::Modify => "Modify",
        };
        write!(f, "{name}")
    }
}

/// One side of a change: where the leaf lives and what it points at
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ChangeSide {
    pub path: String,
    pub entry: DatabaseEntry,
}

impl ChangeSide {
    pub fn oid(&self) -> &ObjectId {
        &self.entry.oid
    }

    pub fn mode(&self) -> EntryMode {
        self.entry.mode
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, new)]
pub struct ChangeEntry {
    pub from: Option<ChangeSide>,
    pub to: Option<ChangeSide>,
}

impl ChangeEntry {
    pub fn inserted(path: String, entry: DatabaseEntry) -> Self {
        Self::new(None, Some(ChangeSide::new(path, entry)))
    }

    pub fn deleted(path: String, entry: DatabaseEntry) -> Self {
        Self::new(Some(ChangeSide::new(path, entry)), None)
    }

    pub fn modified(path: String, old: DatabaseEntry, new: DatabaseEntry) -> Self {
        Self::new(
            Some(ChangeSide::new(path.clone(), old)),
            Some(ChangeSide::new(path, new)),
        )
    }

    pub fn from_path(&self) -> Option<&str> {
        self.from.as_ref().map(|side| side.path.as_str())
    }

    pub fn to_path(&self) -> Option<&str> {
        self.to.as_ref().map(|side| side.path.as_str())
    }

    /// Derive the action from which sides are present
    pub fn classify(&self) -> Result<Action, DiffError> {
        match (&self.from, &self.to) {
            (None, Some(_)) => Ok(Action::Insert),
            (Some(_), None) => Ok(Action::Delete),
            (Some(_), Some(_)) => Ok(Action::Modify),
            (None, None) => Err(DiffError::MalformedChangeEntry),
        }
    }

    /// Path the change is reported under: the new location, or the old one
    /// for a deletion
    pub fn path(&self) -> Result<&str, DiffError> {
        self.to_path()
            .or_else(|| self.from_path())
            .ok_or(DiffError::MalformedChangeEntry)
    }
}
