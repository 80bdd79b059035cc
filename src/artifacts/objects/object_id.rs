//! Object identifier (SHA-1 digest)
//!
//! Object IDs are 40-character lowercase hexadecimal strings. They identify
//! every stored object by the digest of its framed content
//! `"<kind> <len>\0<payload>"`.
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, RAW_OBJECT_ID_LENGTH};
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

/// Object identifier (SHA-1 hash)
///
/// Holds the lowercase hex form together with the raw digest bytes, so
/// neither has to be re-derived or can fail after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    hex: String,
    raw: [u8; RAW_OBJECT_ID_LENGTH],
}

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Uppercase digits are accepted and normalised to lowercase.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }

        let hex = id.to_ascii_lowercase();
        let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)?;
        }

        Ok(Self { hex, raw })
    }

    /// Digest arbitrary bytes into an object ID
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);

        let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
        raw.copy_from_slice(&hasher.finalize());
        Self::from_digest(raw)
    }

    /// Build an object ID from its 20 raw digest bytes
    pub fn from_raw(raw: &[u8]) -> anyhow::Result<Self> {
        let raw: [u8; RAW_OBJECT_ID_LENGTH] = raw
            .try_into()
            .map_err(|_| anyhow::anyhow!("Invalid raw object ID length: {}", raw.len()))?;

        Ok(Self::from_digest(raw))
    }

    fn from_digest(raw: [u8; RAW_OBJECT_ID_LENGTH]) -> Self {
        let hex = raw.iter().map(|byte| format!("{byte:02x}")).collect();
        Self { hex, raw }
    }

    /// The 20 raw digest bytes, as stored in index entries and tree records
    pub fn to_raw(&self) -> [u8; RAW_OBJECT_ID_LENGTH] {
        self.raw
    }

    /// Write the object ID in binary format (20 bytes)
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        writer.write_all(&self.to_raw())?;
        Ok(())
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.hex.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.hex[..7].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.hex
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_digest_matches_known_value() {
        // sha1("blob 0\0"), the digest of the empty blob
        let oid = ObjectId::digest(b"blob 0\0");
        assert_eq!(oid.as_ref(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn test_raw_bytes_survive_conversion() {
        let oid = ObjectId::digest(b"some content");
        let raw = oid.to_raw();

        assert_eq!(ObjectId::from_raw(&raw).unwrap(), oid);

        let mut buffer = Vec::new();
        oid.write_h40_to(&mut buffer).unwrap();
        assert_eq!(buffer, raw.to_vec());
    }

    #[test]
    fn test_parsed_and_digested_ids_agree() {
        let digested = ObjectId::digest(b"blob 0\0");
        let parsed =
            ObjectId::try_parse("E69DE29BB2D1D6434B8B29AE775AD8C2E48C5391".to_string()).unwrap();

        assert_eq!(parsed, digested);
        assert_eq!(parsed.to_raw(), digested.to_raw());
        assert_eq!(parsed.to_raw()[..2], [0xe6, 0x9d]);
    }

    #[test]
    fn test_short_raw_input_is_rejected() {
        assert!(ObjectId::from_raw(&[0u8; 19]).is_err());
    }

    #[test]
    fn test_object_path_is_sharded_by_first_two_digits() {
        let oid =
            ObjectId::try_parse("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".to_string()).unwrap();

        assert_eq!(
            oid.to_path(),
            PathBuf::from("e6").join("9de29bb2d1d6434b8b29ae775ad8c2e48c5391")
        );
        assert_eq!(oid.to_short_oid(), "e69de29");
    }

    #[rstest]
    #[case("e69de29")]
    #[case("zz9de29bb2d1d6434b8b29ae775ad8c2e48c5391")]
    #[case("e69de29bb2d1d6434b8b29ae775ad8c2e48c53911")]
    fn test_invalid_object_ids_are_rejected(#[case] id: &str) {
        assert!(ObjectId::try_parse(id.to_string()).is_err());
    }
}
