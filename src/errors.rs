//! Repository error taxonomy
//!
//! Structural failures of the object store, the index and the tree codec are
//! reported through [`RepositoryError`]. Operations still return
//! `anyhow::Result`, so callers recover the variant with
//! `error.downcast_ref::<RepositoryError>()`.

use crate::artifacts::objects::object_type::ObjectType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Bad signature, version, checksum or entry layout in the index file
    #[error("corrupt index: {0}")]
    CorruptIndex(String),
    /// Undecodable object or declared size not matching the payload
    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: String, reason: String },
    #[error("corrupt tree: {0}")]
    CorruptTree(String),
    #[error("object {0} not found")]
    NotFound(String),
    #[error("{count} objects share the prefix {prefix}")]
    AmbiguousPrefix { prefix: String, count: usize },
    #[error("invalid object prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },
    /// Only a single flat directory level can be written as a tree
    #[error("path {0} is nested; only a single top-level directory is supported")]
    UnsupportedNestedTree(String),
    #[error("path {0} does not exist in the working directory")]
    PathNotFound(String),
    #[error("path {path} is {len} bytes long; index paths must be shorter than 4096 bytes")]
    PathTooLong { path: String, len: usize },
    #[error("expected a {expected} object, found {found}")]
    UnexpectedObjectType {
        expected: ObjectType,
        found: ObjectType,
    },
}

impl RepositoryError {
    pub(crate) fn corrupt_object(oid: impl Into<String>, reason: impl Into<String>) -> Self {
        RepositoryError::CorruptObject {
            oid: oid.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_prefix(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        RepositoryError::InvalidPrefix {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }
}
