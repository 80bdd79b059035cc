use is_executable::IsExecutable;
use std::fs::Metadata;
use std::path::Path;

const TYPE_MASK: u32 = 0o170000;
const TREE_TYPE: u32 = 0o040000;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

/// Classification of the mode bits twig itself writes.
///
/// Index entries and tree records keep whatever raw `u32` they were decoded
/// with; this enum only names the modes produced when staging files.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Directory => TREE_TYPE,
        }
    }

    /// Whether raw mode bits describe a subtree
    pub fn is_tree_mode(mode: u32) -> bool {
        mode & TYPE_MASK == TREE_TYPE
    }

    /// Parse the octal text used in tree records (`100644`, `40000`, `120000`, ...)
    pub fn parse_octal(mode: &str) -> anyhow::Result<u32> {
        if mode.is_empty() || !mode.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            anyhow::bail!("Invalid octal entry mode {mode:?}");
        }

        u32::from_str_radix(mode, 8).map_err(|_| anyhow::anyhow!("Entry mode {mode:?} out of range"))
    }

    /// Normalise live file permissions the way git does: any execute bit
    /// makes the file executable, everything else is a regular file.
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            EntryMode::Directory
        } else if path.is_executable() {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        }
    }
}

impl From<EntryMode> for u32 {
    fn from(mode: EntryMode) -> Self {
        mode.as_u32()
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}
