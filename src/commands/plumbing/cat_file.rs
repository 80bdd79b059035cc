use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepositoryError;
use bytes::Bytes;

/// What `cat-file` prints for the resolved object
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CatFileMode {
    /// Raw payload; the object must be a commit
    Commit,
    /// Raw payload; the object must be a tree
    Tree,
    /// Raw payload; the object must be a blob
    Blob,
    /// Payload length in bytes
    Size,
    /// Object kind
    Type,
    /// Human readable rendering of any kind
    Pretty,
}

impl CatFileMode {
    fn expected_type(&self) -> Option<ObjectType> {
        match self {
            CatFileMode::Commit => Some(ObjectType::Commit),
            CatFileMode::Tree => Some(ObjectType::Tree),
            CatFileMode::Blob => Some(ObjectType::Blob),
            CatFileMode::Size | CatFileMode::Type | CatFileMode::Pretty => None,
        }
    }
}

impl Repository {
    /// Resolve a digest or unique prefix to the kind and payload of a stored object
    pub fn read_object(&self, prefix: &str) -> anyhow::Result<(ObjectId, ObjectType, Bytes)> {
        self.database().read_object(prefix)
    }

    pub fn cat_file(&self, mode: CatFileMode, prefix: &str) -> anyhow::Result<()> {
        let (object_id, object_type, payload) = self.read_object(prefix)?;

        if let Some(expected) = mode.expected_type()
            && expected != object_type
        {
            return Err(RepositoryError::UnexpectedObjectType {
                expected,
                found: object_type,
            }
            .into());
        }

        match mode {
            CatFileMode::Commit | CatFileMode::Tree | CatFileMode::Blob => {
                self.writer().write_all(&payload)?;
            }
            CatFileMode::Size => {
                writeln!(self.writer(), "{}", payload.len())?;
            }
            CatFileMode::Type => {
                writeln!(self.writer(), "{object_type}")?;
            }
            CatFileMode::Pretty => match object_type {
                ObjectType::Blob => {
                    self.writer().write_all(&payload)?;
                }
                ObjectType::Commit => {
                    let commit = Commit::deserialize(payload).map_err(|e| {
                        RepositoryError::corrupt_object(object_id.to_string(), e.to_string())
                    })?;
                    write!(self.writer(), "{}", commit.display())?;
                }
                ObjectType::Tree => {
                    for entry in Tree::deserialize(payload)?.entries() {
                        writeln!(
                            self.writer(),
                            "{:06o} {} {}\t{}",
                            entry.mode(),
                            entry.object_type(),
                            entry.oid(),
                            entry.name()
                        )?;
                    }
                }
            },
        }

        Ok(())
    }
}
