use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::RepositoryError;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::Write;

/// Writer that digests everything passing through it, so the index trailer
/// can be appended once the last entry is written.
#[derive(Debug)]
pub struct Checksum<W> {
    writer: W,
    digest: Sha1,
}

impl<W: Write> Checksum<W> {
    pub(crate) fn new(writer: W) -> Self {
        Checksum {
            writer,
            digest: Sha1::new(),
        }
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    /// Append the digest of all bytes written so far and hand back the writer
    pub(crate) fn write_checksum(mut self) -> anyhow::Result<W> {
        let checksum = self.digest.finalize();
        self.writer
            .write_all(checksum.as_slice())
            .map_err(|_| anyhow::anyhow!("Failed to write checksum to index file"))?;

        Ok(self.writer)
    }
}

/// Split the trailing digest off `data` and check it against the digest of
/// everything before it. Returns the checked body.
pub(crate) fn verify(data: &Bytes) -> anyhow::Result<Bytes> {
    if data.len() < CHECKSUM_SIZE {
        return Err(RepositoryError::CorruptIndex(format!(
            "file is {} bytes, too short to hold a checksum",
            data.len()
        ))
        .into());
    }

    let (body, expected) = data.split_at(data.len() - CHECKSUM_SIZE);
    let actual = Sha1::digest(body);

    if expected != actual.as_slice() {
        return Err(RepositoryError::CorruptIndex(
            "checksum does not match value stored on disk".to_string(),
        )
        .into());
    }

    Ok(data.slice(..data.len() - CHECKSUM_SIZE))
}
