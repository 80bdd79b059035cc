//! Tree object
//!
//! Trees are flat directory listings: an ordered sequence of
//! `(mode, name, object id)` records. Only a single top-level directory is
//! supported, so names never contain a `/`.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<records>`
//! Each record: `<octal-mode> <name>\0<20-byte-sha1>`, concatenated without
//! any outer length prefix.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::RAW_OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::io::Write;

/// One record of a flat tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    mode: u32,
    name: String,
    oid: ObjectId,
}

impl TreeEntry {
    /// Build a record, rejecting names that would need a nested tree
    pub fn try_new(mode: u32, name: impl Into<String>, oid: ObjectId) -> anyhow::Result<Self> {
        let name = name.into();

        if name.contains('/') {
            return Err(RepositoryError::UnsupportedNestedTree(name).into());
        }
        if name.is_empty() || name.contains('\0') {
            anyhow::bail!("Invalid tree entry name {name:?}");
        }

        Ok(TreeEntry { mode, name, oid })
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    /// Kind of the object the record points at
    pub fn object_type(&self) -> ObjectType {
        if EntryMode::is_tree_mode(self.mode) {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }
}

/// Flat directory snapshot, kept in the order it was built or decoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    /// Build a tree from index entries, preserving index order
    ///
    /// Fails with `UnsupportedNestedTree` on the first entry whose path
    /// contains a directory separator.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let entries = entries
            .map(|entry| TreeEntry::try_new(entry.mode(), entry.name(), entry.oid().clone()))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Tree { entries })
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for entry in &self.entries {
            write!(content_bytes, "{:o} {}", entry.mode, entry.name)?;
            content_bytes.push(0);
            entry.oid.write_h40_to(&mut content_bytes)?;
        }

        Ok(Bytes::from(content_bytes))
    }
}

impl Unpackable for Tree {
    /// Decode records with a cursor that stops exactly at the end of the
    /// payload; a record cut short anywhere is `CorruptTree`.
    fn deserialize(bytes: Bytes) -> anyhow::Result<Self> {
        let mut entries = Vec::new();
        let mut cursor = 0;

        while cursor < bytes.len() {
            let header_end = bytes[cursor..]
                .iter()
                .position(|&b| b == 0)
                .map(|offset| cursor + offset)
                .ok_or_else(|| corrupt(format!("record at byte {cursor} has no terminator")))?;
            let header = std::str::from_utf8(&bytes[cursor..header_end])
                .map_err(|_| corrupt(format!("record at byte {cursor} is not UTF-8")))?;
            let (mode, name) = header
                .split_once(' ')
                .ok_or_else(|| corrupt(format!("record {header:?} has no mode separator")))?;
            let mode = EntryMode::parse_octal(mode).map_err(|e| corrupt(e.to_string()))?;

            let oid_end = header_end + 1 + RAW_OBJECT_ID_LENGTH;
            if oid_end > bytes.len() {
                return Err(corrupt(format!("record {name:?} has a truncated object id")));
            }
            let oid = ObjectId::from_raw(&bytes[header_end + 1..oid_end])?;

            let entry = TreeEntry::try_new(mode, name, oid).map_err(|e| corrupt(e.to_string()))?;
            entries.push(entry);
            cursor = oid_end;
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:06o} {} {}\t{}",
                    entry.mode,
                    entry.object_type(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

fn corrupt(reason: impl Into<String>) -> anyhow::Error {
    RepositoryError::CorruptTree(reason.into()).into()
}
