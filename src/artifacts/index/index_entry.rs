//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path (UTF-8, `/`-separated, relative to the working directory)
//! - Content hash (object ID of the staged blob)
//! - File metadata (mode, size, timestamps, device, inode, owner)
//! - A 16-bit flags field: low 12 bits hold the path length, bits 12-13 the stage
//!
//! ## Entry Format
//!
//! ```text
//! ctime_s ctime_ns mtime_s mtime_ns dev ino mode uid gid size   (10 x u32, big-endian)
//! oid                                                           (20 raw bytes)
//! flags                                                         (u16, big-endian)
//! path \0 [\0 ...]                                              (padded to 8 bytes)
//! ```

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// Maximum path length supported in index entries
pub const MAX_PATH_SIZE: usize = 0xFFF;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Size of the fixed-width part of an entry (everything before the path)
pub const ENTRY_FIXED_SIZE: usize = 62;

/// Minimum size of an index entry in bytes
pub const ENTRY_MIN_SIZE: usize = 64;

const STAGE_SHIFT: u16 = 12;
const STAGE_MASK: u16 = 0b11;

/// Index entry representing a tracked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    name: String,
    oid: ObjectId,
    metadata: EntryMetadata,
    flags: u16,
}

impl IndexEntry {
    /// Build a stage-0 entry, rejecting paths that do not fit the 12-bit
    /// length field of the flags.
    pub fn try_new(
        name: impl Into<String>,
        oid: ObjectId,
        metadata: EntryMetadata,
    ) -> anyhow::Result<Self> {
        let name = name.into();

        if name.is_empty() || name.contains('\0') {
            anyhow::bail!("Invalid index entry path {name:?}");
        }
        if name.len() > MAX_PATH_SIZE {
            return Err(RepositoryError::PathTooLong {
                len: name.len(),
                path: name,
            }
            .into());
        }

        Ok(IndexEntry {
            flags: name.len() as u16,
            name,
            oid,
            metadata,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }

    pub fn mode(&self) -> u32 {
        self.metadata.mode
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Merge stage recorded in bits 12-13 of the flags
    pub fn stage(&self) -> u8 {
        ((self.flags >> STAGE_SHIFT) & STAGE_MASK) as u8
    }

    /// Total on-disk size of an entry whose path is `name_len` bytes long:
    /// the fixed part, the path and at least one null, rounded up to 8 bytes.
    pub fn padded_size(name_len: usize) -> usize {
        (ENTRY_FIXED_SIZE + name_len + ENTRY_BLOCK) / ENTRY_BLOCK * ENTRY_BLOCK
    }

    /// Decode the entry starting at the beginning of `bytes`, returning it
    /// with the number of bytes it occupies.
    pub fn decode_from(bytes: &Bytes) -> anyhow::Result<(Self, usize)> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(corrupt(format!(
                "truncated entry: {} bytes left, at least {ENTRY_MIN_SIZE} needed",
                bytes.len()
            )));
        }

        let name_len = bytes[ENTRY_FIXED_SIZE..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing null terminator in entry path"))?;
        let size = Self::padded_size(name_len);

        if size > bytes.len() {
            return Err(corrupt("entry padding runs past the end of the index"));
        }

        let entry = Self::deserialize(bytes.slice(..size))?;
        Ok((entry, size))
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// File metadata stored in index entries
///
/// Fields are kept at the width the index stores them (32 bits); wider
/// values reported by the filesystem are truncated on capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Change time (seconds since Unix epoch)
    pub ctime: u32,
    pub ctime_nsec: u32,
    /// Modification time (seconds since Unix epoch)
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    /// Raw file mode (type and permission bits)
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size in bytes
    pub size: u32,
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let metadata = &self.metadata;

        let mut entry_bytes = Vec::with_capacity(Self::padded_size(self.name.len()));
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.ino)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.mode)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.size)?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.flags)?;
        entry_bytes.write_all(self.name.as_bytes())?;

        // There must be at least one null byte at the end
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(bytes: Bytes) -> anyhow::Result<Self> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(corrupt("invalid index entry size"));
        }

        let read_u32 = |offset: usize| byteorder::NetworkEndian::read_u32(&bytes[offset..offset + 4]);
        let mode = read_u32(24);
        let oid = ObjectId::from_raw(&bytes[40..60])?;
        let flags = byteorder::NetworkEndian::read_u16(&bytes[60..62]);

        // Extract the entry name, which is null-terminated
        let name_end = bytes[ENTRY_FIXED_SIZE..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing null terminator in entry path"))?;
        let name_bytes = &bytes[ENTRY_FIXED_SIZE..ENTRY_FIXED_SIZE + name_end];
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| corrupt("invalid UTF-8 in entry path"))?
            .to_string();

        let recorded_len = (flags & MAX_PATH_SIZE as u16) as usize;
        if recorded_len != name.len().min(MAX_PATH_SIZE) {
            return Err(corrupt(format!(
                "entry {name} records a path length of {recorded_len}"
            )));
        }

        Ok(IndexEntry {
            name,
            oid,
            metadata: EntryMetadata {
                ctime: read_u32(0),
                ctime_nsec: read_u32(4),
                mtime: read_u32(8),
                mtime_nsec: read_u32(12),
                dev: read_u32(16),
                ino: read_u32(20),
                mode,
                uid: read_u32(28),
                gid: read_u32(32),
                size: read_u32(36),
            },
            flags,
        })
    }
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self, Self::Error> {
        if !metadata.is_file() {
            anyhow::bail!("{} is not a regular file", file_path.display());
        }

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: EntryMode::from_metadata(file_path, &metadata).as_u32(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        })
    }
}

fn corrupt(reason: impl Into<String>) -> anyhow::Error {
    RepositoryError::CorruptIndex(reason.into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::FileMode;
    use proptest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn oid() -> ObjectId {
        ObjectId::digest(b"test data")
    }

    #[fixture]
    fn entry_metadata() -> EntryMetadata {
        EntryMetadata {
            ctime: 1_700_000_000,
            ctime_nsec: 12,
            mtime: 1_700_000_001,
            mtime_nsec: 34,
            dev: 2049,
            ino: 131_072,
            mode: EntryMode::File(FileMode::Regular).as_u32(),
            uid: 1000,
            gid: 1000,
            size: 9,
        }
    }

    #[rstest]
    #[case("a", 64)]
    #[case("abcdefg", 72)]
    #[case("abcdef", 72)]
    #[case("abcdefghijklmn", 80)]
    fn test_entry_is_padded_to_block(
        oid: ObjectId,
        entry_metadata: EntryMetadata,
        #[case] name: &str,
        #[case] expected_size: usize,
    ) {
        let entry = IndexEntry::try_new(name, oid, entry_metadata).unwrap();
        let bytes = entry.serialize().unwrap();

        assert_eq!(bytes.len(), expected_size);
        assert_eq!(IndexEntry::padded_size(name.len()), expected_size);
        assert_eq!(bytes[ENTRY_FIXED_SIZE + name.len()], 0);
    }

    #[rstest]
    fn test_entry_decodes_what_it_encodes(oid: ObjectId, entry_metadata: EntryMetadata) {
        let entry = IndexEntry::try_new("src/main.rs", oid, entry_metadata).unwrap();
        let bytes = entry.serialize().unwrap();

        let (decoded, size) = IndexEntry::decode_from(&bytes).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(size, bytes.len());
    }

    #[rstest]
    fn test_flags_hold_path_length_and_stage(oid: ObjectId, entry_metadata: EntryMetadata) {
        let entry = IndexEntry::try_new("notes.txt", oid, entry_metadata).unwrap();

        assert_eq!(entry.flags(), 9);
        assert_eq!(entry.stage(), 0);
    }

    #[rstest]
    fn test_path_length_must_fit_twelve_bits(oid: ObjectId, entry_metadata: EntryMetadata) {
        let name = "x".repeat(MAX_PATH_SIZE + 1);
        let error = IndexEntry::try_new(name, oid.clone(), entry_metadata).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::PathTooLong { len: 4096, .. })
        ));
        assert!(IndexEntry::try_new("x".repeat(MAX_PATH_SIZE), oid, entry_metadata).is_ok());
    }

    #[rstest]
    fn test_truncated_entry_is_corrupt(oid: ObjectId, entry_metadata: EntryMetadata) {
        let entry = IndexEntry::try_new("a.txt", oid, entry_metadata).unwrap();
        let bytes = entry.serialize().unwrap();

        let error = IndexEntry::decode_from(&bytes.slice(..40)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::CorruptIndex(_))
        ));
    }

    #[rstest]
    fn test_group_writable_mode_is_kept(oid: ObjectId, entry_metadata: EntryMetadata) {
        let metadata = EntryMetadata { mode: 0o100664, ..entry_metadata };
        let bytes = IndexEntry::try_new("shared.txt", oid, metadata).unwrap().serialize().unwrap();

        let (decoded, _) = IndexEntry::decode_from(&bytes).unwrap();
        assert_eq!(decoded.mode(), 0o100664);
    }

    proptest! {
        #[test]
        fn test_any_mode_survives_encoding(mode in any::<u32>(), size in any::<u32>()) {
            let metadata = EntryMetadata { mode, size, ..EntryMetadata::default() };
            let entry = IndexEntry::try_new("link", ObjectId::digest(b"target"), metadata).unwrap();

            let (decoded, _) = IndexEntry::decode_from(&entry.serialize().unwrap()).unwrap();
            prop_assert_eq!(decoded, entry);
        }
    }
}
