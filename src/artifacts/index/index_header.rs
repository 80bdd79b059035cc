use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::RepositoryError;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub(crate) marker: [u8; 4],
    pub(crate) version: u32,
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn with_count(entries_count: u32) -> Self {
        IndexHeader {
            marker: *SIGNATURE,
            version: VERSION,
            entries_count,
        }
    }

    /// Reject anything but a `DIRC` version 2 header
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if &self.marker != SIGNATURE {
            return Err(RepositoryError::CorruptIndex(format!(
                "invalid signature {:?}",
                String::from_utf8_lossy(&self.marker)
            ))
            .into());
        }

        if self.version != VERSION {
            return Err(RepositoryError::CorruptIndex(format!(
                "unsupported version {}",
                self.version
            ))
            .into());
        }

        Ok(())
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(&self.marker)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    fn deserialize(bytes: Bytes) -> anyhow::Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(RepositoryError::CorruptIndex(format!(
                "header is {} bytes, expected {HEADER_SIZE}",
                bytes.len()
            ))
            .into());
        }

        let mut marker = [0u8; 4];
        marker.copy_from_slice(&bytes[0..4]);
        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_layout() {
        let header = IndexHeader::with_count(3);
        let bytes = header.serialize().unwrap();

        assert_eq!(bytes.as_ref(), b"DIRC\0\0\0\x02\0\0\0\x03");
        assert_eq!(IndexHeader::deserialize(bytes).unwrap(), header);
    }

    #[test]
    fn test_wrong_version_is_corrupt() {
        let header = IndexHeader::new(*SIGNATURE, 3, 0);
        let error = header.validate().unwrap_err();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::CorruptIndex("unsupported version 3".to_string()))
        );
    }

    #[test]
    fn test_wrong_signature_is_corrupt() {
        let header = IndexHeader::new(*b"DIRD", VERSION, 0);

        assert!(header.validate().is_err());
    }
}
