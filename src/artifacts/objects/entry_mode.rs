//! Tree entry modes
//!
//! Git stores a mode next to every tree entry. Only directories have kind
//! `Directory`; every other mode (regular, executable, symlink, gitlink) is a
//! leaf of kind `File` as far as tree diffing is concerned.

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    Symlink,
    Gitlink,
}

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    #[default]
    Directory,
}

/// Structural kind of a tree entry
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// Mode printed for the absent side of a change in raw diff output
pub const NULL_MODE: &str = "000000";

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::File(FileMode::Symlink) => "120000",
            EntryMode::File(FileMode::Gitlink) => "160000",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::File(FileMode::Symlink) => 0o120000,
            EntryMode::File(FileMode::Gitlink) => 0o160000,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            EntryMode::Directory => EntryKind::Directory,
            EntryMode::File(_) => EntryKind::File,
        }
    }

    pub fn is_tree(&self) -> bool {
        self.kind() == EntryKind::Directory
    }

    /// Parse the octal mode string found in tree objects
    ///
    /// Git writes directories as `40000` but older tools wrote `040000`, so
    /// the value is compared numerically rather than textually.
    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        let value = u32::from_str_radix(mode, 8)
            .map_err(|_| anyhow::anyhow!("Invalid entry mode {mode}"))?;

        Self::try_from(value)
    }

    /// Six-column form used by raw diff output (`040000` for directories)
    pub fn as_padded_str(&self) -> String {
        format!("{:06o}", self.as_u32())
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(mode: u32) -> anyhow::Result<Self> {
        match mode {
            0o100644 | 0o100664 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::File(FileMode::Symlink)),
            0o160000 => Ok(EntryMode::File(FileMode::Gitlink)),
            0o40000 => Ok(EntryMode::Directory),
            _ => Err(anyhow::anyhow!("Invalid entry mode {mode:o}")),
        }
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
