//! Blob object
//!
//! Blobs store raw file content, without any metadata like filename or
//! permissions (those live in index entries and trees).
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content split into lines, decoded lossily as UTF-8
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.content)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(bytes: Bytes) -> anyhow::Result<Self> {
        Ok(Self::new(bytes))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blob_id_covers_header() {
        let blob = Blob::new(Bytes::from_static(b"hello world\n"));

        assert_eq!(blob.framed().unwrap().as_ref(), b"blob 12\0hello world\n");
        // same value `git hash-object` reports for this content
        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "3b18e512dba79e4c8300dd08aeb37f8e728b8dad"
        );
    }

    #[test]
    fn test_blob_lines() {
        let blob = Blob::new(Bytes::from_static(b"one\ntwo\r\nthree"));

        assert_eq!(blob.lines(), vec!["one", "two", "three"]);
    }
}
