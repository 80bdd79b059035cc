use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Minimum prefix length: enough to select a shard directory
pub const MIN_PREFIX_LENGTH: usize = 2;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Digest `payload` as an object of `object_type`, writing it to the
    /// store when `persist` is set and no object with that digest exists yet.
    pub fn hash_object(
        &self,
        payload: &[u8],
        object_type: ObjectType,
        persist: bool,
    ) -> anyhow::Result<ObjectId> {
        let framed = frame(object_type, payload)?;
        let object_id = ObjectId::digest(&framed);

        if persist {
            if self.exists(&object_id) {
                tracing::debug!(oid = %object_id, kind = %object_type, "object already stored");
            } else {
                self.write_object(&object_id, framed)?;
                tracing::debug!(oid = %object_id, kind = %object_type, size = payload.len(), "object written");
            }
        }

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.hash_object(&object.serialize()?, object.object_type(), true)
    }

    /// Resolve `prefix` and return the kind and payload of the object it names
    pub fn read_object(&self, prefix: &str) -> anyhow::Result<(ObjectId, ObjectType, Bytes)> {
        let object_id = self.resolve_prefix(prefix)?;
        let (object_type, payload) = self.load(&object_id)?;

        Ok((object_id, object_type, payload))
    }

    /// Expand an abbreviated digest to the single stored object it names
    pub fn resolve_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = self.find_objects_by_prefix(&prefix)?;

        tracing::debug!(prefix = %prefix, matches = matches.len(), "resolved object prefix");

        match matches.len() {
            0 => Err(RepositoryError::NotFound(prefix).into()),
            1 => Ok(matches.remove(0)),
            count => Err(RepositoryError::AmbiguousPrefix { prefix, count }.into()),
        }
    }

    /// Find all objects whose digest starts with `prefix`
    ///
    /// Only the shard directory named by the first two digits is scanned, so
    /// a prefix must be at least two hex digits long.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if prefix.len() < MIN_PREFIX_LENGTH {
            return Err(RepositoryError::invalid_prefix(
                prefix,
                format!("at least {MIN_PREFIX_LENGTH} hex digits are required"),
            )
            .into());
        }
        if prefix.len() > OBJECT_ID_LENGTH {
            return Err(RepositoryError::invalid_prefix(
                prefix,
                format!("longer than {OBJECT_ID_LENGTH} hex digits"),
            )
            .into());
        }
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RepositoryError::invalid_prefix(prefix, "not a hex string").into());
        }

        let (dir_name, file_prefix) = prefix.split_at(MIN_PREFIX_LENGTH);
        let dir_path = self.path.join(dir_name);
        let mut matches = Vec::new();

        if !dir_path.is_dir() {
            return Ok(matches);
        }

        for entry in std::fs::read_dir(&dir_path)
            .with_context(|| format!("Unable to list object directory {}", dir_path.display()))?
        {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix) {
                // temporary files never parse as object ids
                if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Read, inflate and unframe a stored object
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_path = self.object_path(object_id);

        if !object_path.is_file() {
            return Err(RepositoryError::NotFound(object_id.to_string()).into());
        }

        let compressed = std::fs::read(&object_path)
            .with_context(|| format!("Unable to read object file {}", object_path.display()))?;
        let content = Self::decompress(&compressed)
            .map_err(|e| RepositoryError::corrupt_object(object_id.to_string(), e.to_string()))?;

        Self::unframe(object_id, content)
    }

    /// Split `"<kind> <len>\0<payload>"`, checking the declared length
    fn unframe(object_id: &ObjectId, content: Bytes) -> anyhow::Result<(ObjectType, Bytes)> {
        let corrupt = |reason: String| RepositoryError::corrupt_object(object_id.to_string(), reason);

        let header_end = content
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing header terminator".to_string()))?;
        let header = std::str::from_utf8(&content[..header_end])
            .map_err(|_| corrupt("header is not UTF-8".to_string()))?;
        let (kind, declared_size) = header
            .split_once(' ')
            .ok_or_else(|| corrupt(format!("malformed header {header:?}")))?;

        let object_type =
            ObjectType::try_from(kind).map_err(|_| corrupt(format!("unknown kind {kind:?}")))?;
        let declared_size = declared_size
            .parse::<usize>()
            .map_err(|_| corrupt(format!("invalid size {declared_size:?}")))?;

        let payload = content.slice(header_end + 1..);
        if payload.len() != declared_size {
            return Err(corrupt(format!(
                "declared size {declared_size} but payload is {} bytes",
                payload.len()
            ))
            .into());
        }

        Ok((object_type, payload))
    }

    fn load_as(&self, object_id: &ObjectId, expected: ObjectType) -> anyhow::Result<Bytes> {
        let (object_type, payload) = self.load(object_id)?;

        if object_type != expected {
            return Err(RepositoryError::UnexpectedObjectType {
                expected,
                found: object_type,
            }
            .into());
        }

        Ok(payload)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        Blob::deserialize(self.load_as(object_id, ObjectType::Blob)?)
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        Tree::deserialize(self.load_as(object_id, ObjectType::Tree)?)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        Commit::deserialize(self.load_as(object_id, ObjectType::Commit)?)
            .map_err(|e| RepositoryError::corrupt_object(object_id.to_string(), e.to_string()).into())
    }

    fn write_object(&self, object_id: &ObjectId, framed: Bytes) -> anyhow::Result<()> {
        let object_path = self.object_path(object_id);
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;

        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        let object_content = Self::compress(&framed)?;

        // write into a sibling temp file and rename it into place
        let mut temp_file = tempfile::NamedTempFile::new_in(object_dir).with_context(|| {
            format!("Unable to create temp object file in {}", object_dir.display())
        })?;
        temp_file.write_all(&object_content).with_context(|| {
            format!("Unable to write temp object file {}", temp_file.path().display())
        })?;
        temp_file.persist(&object_path).with_context(|| {
            format!("Unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }
}
