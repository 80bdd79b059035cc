//! Index (staging area)
//!
//! The index tracks which files should be included in the next commit, along
//! with the filesystem metadata and blob digest recorded when each was staged.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: Signature, version, and entry count
//! - Entries: Sorted list of tracked files with metadata
//! - Checksum: SHA-1 hash of everything before it
//!
//! The file is always replaced wholesale: the new content is written to a
//! temporary file next to it and renamed over the old one.

use crate::artifacts::index::checksum::{self, Checksum};
use crate::artifacts::index::index_entry::{ENTRY_MIN_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exclusive hold on the index lock file
pub struct IndexLock {
    _guard: file_guard::FileGuard<Box<std::fs::File>>,
}

/// In-memory view of the index file
///
/// Entries are keyed by path, so iteration always yields them sorted and a
/// path is never staged twice.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    entries: BTreeMap<String, IndexEntry>,
    /// Whether the entries differ from what was last loaded or written
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Advisory lock file guarding read-modify-write cycles
    pub fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lck")
    }

    /// Take an exclusive lock on the lock file, held until the guard drops
    pub fn lock(&self) -> anyhow::Result<IndexLock> {
        let lock_path = self.lock_path();
        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Unable to open lock file {}", lock_path.display()))?;
        let guard = file_guard::lock(Box::new(lock_file), file_guard::Lock::Exclusive, 0, 1)
            .with_context(|| format!("Unable to lock {}", lock_path.display()))?;

        Ok(IndexLock { _guard: guard })
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// A missing file is a fresh repository and loads as an empty index.
    /// An existing file, even a zero-byte one, must carry a valid checksum,
    /// signature and version, or the load fails with `CorruptIndex`.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no index file, starting empty");
            return Ok(());
        }

        let data = std::fs::read(&self.path)
            .with_context(|| format!("Unable to read index file {}", self.path.display()))?;

        for entry in Self::decode(Bytes::from(data))? {
            self.entries.insert(entry.name().to_string(), entry);
        }

        tracing::debug!(entries = self.entries.len(), "index loaded");

        Ok(())
    }

    /// Parse a complete index file image
    ///
    /// The checksum is verified before anything else is looked at. Entries
    /// must be strictly sorted by path and must account for every byte
    /// between the header and the checksum.
    pub fn decode(data: Bytes) -> anyhow::Result<Vec<IndexEntry>> {
        let body = checksum::verify(&data)?;

        let header = IndexHeader::deserialize(body.clone())?;
        header.validate()?;

        let capacity = (header.entries_count as usize).min(body.len() / ENTRY_MIN_SIZE);
        let mut entries: Vec<IndexEntry> = Vec::with_capacity(capacity);
        let mut cursor = HEADER_SIZE;

        for _ in 0..header.entries_count {
            let (entry, size) = IndexEntry::decode_from(&body.slice(cursor..))?;

            if let Some(previous) = entries.last().map(IndexEntry::name)
                && previous >= entry.name()
            {
                return Err(RepositoryError::CorruptIndex(format!(
                    "entry {} is out of order after {previous}",
                    entry.name()
                ))
                .into());
            }

            entries.push(entry);
            cursor += size;
        }

        if cursor != body.len() {
            return Err(RepositoryError::CorruptIndex(format!(
                "{} trailing bytes after {} entries",
                body.len() - cursor,
                header.entries_count
            ))
            .into());
        }

        Ok(entries)
    }

    /// Serialize entries, already sorted by path, into a complete index file
    /// image: header, 8-byte aligned entries, trailing checksum.
    pub fn encode<'e>(entries: impl ExactSizeIterator<Item = &'e IndexEntry>) -> anyhow::Result<Bytes> {
        let mut writer = Checksum::new(Vec::new());

        let header = IndexHeader::with_count(entries.len() as u32);
        writer.write(&header.serialize()?)?;

        for entry in entries {
            writer.write(&entry.serialize()?)?;
        }

        Ok(Bytes::from(writer.write_checksum()?))
    }

    /// Stage `entry`, replacing any entry recorded for the same path
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.name().to_string(), entry);
        self.changed = true;
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Replace the index file with the current entries
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let content = Self::encode(self.entries.values())?;
        let index_dir = self
            .path
            .parent()
            .with_context(|| format!("Invalid index path {}", self.path.display()))?;

        let mut temp_file = tempfile::NamedTempFile::new_in(index_dir).with_context(|| {
            format!("Unable to create temp index file in {}", index_dir.display())
        })?;
        temp_file
            .write_all(&content)
            .context("Unable to write temp index file")?;
        temp_file
            .persist(&self.path)
            .with_context(|| format!("Unable to replace index file {}", self.path.display()))?;

        self.changed = false;
        tracing::debug!(entries = self.entries.len(), bytes = content.len(), "index written");

        Ok(())
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
