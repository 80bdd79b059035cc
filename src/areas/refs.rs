//! References (HEAD and the branch pointer)
//!
//! There is exactly one branch. `HEAD` is a symbolic reference naming it and
//! the branch file holds the digest of the newest commit, or is absent until
//! the first commit.
//!
//! ## File Format
//!
//! References are stored as text files containing either:
//! - A 40-character SHA-1 hash followed by a newline (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! A missing file means the reference does not exist yet. An existing file
//! that is empty or holds neither form is an error.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// The single branch every commit is recorded on
pub const DEFAULT_BRANCH: &str = "master";

const HEADS_PREFIX: &str = "refs/heads/";

/// Contents of a reference file
#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { name: String },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            anyhow::bail!("ref file at {} is empty", path.display());
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                name: symref_match[1].to_string(),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(
                ObjectId::try_parse(content.to_string())
                    .with_context(|| format!("invalid ref file at {}", path.display()))?,
            )))
        }
    }
}

/// Reference manager rooted at the metadata directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    /// Point `HEAD` at the default branch
    pub fn init_head(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.heads_path())
            .with_context(|| format!("failed to create {}", self.heads_path().display()))?;

        self.update_ref_file(
            &self.head_path(),
            &format!("ref: {HEADS_PREFIX}{DEFAULT_BRANCH}"),
        )
    }

    /// Ref name `HEAD` resolves to, following symbolic references
    ///
    /// A missing or direct `HEAD` resolves to itself.
    pub fn current_ref(&self) -> anyhow::Result<String> {
        self.resolve_symref(HEAD_REF_NAME.to_string())
    }

    fn resolve_symref(&self, name: String) -> anyhow::Result<String> {
        match SymRefOrOid::read_symref_or_oid(&self.path.join(&name))? {
            Some(SymRefOrOid::SymRef { name: target }) => self.resolve_symref(target),
            Some(SymRefOrOid::Oid(_)) | None => Ok(name),
        }
    }

    /// Short name of the branch `HEAD` points at
    pub fn current_branch(&self) -> anyhow::Result<String> {
        let current_ref = self.current_ref()?;

        Ok(current_ref
            .strip_prefix(HEADS_PREFIX)
            .unwrap_or(&current_ref)
            .to_string())
    }

    /// Digest of the branch head, `None` before the first commit
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.path.join(self.current_ref()?);

        match SymRefOrOid::read_symref_or_oid(&ref_path)? {
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            Some(SymRefOrOid::SymRef { .. }) | None => Ok(None),
        }
    }

    /// Move the branch `HEAD` points at to `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let current_ref = self.current_ref()?;
        self.update_ref_file(&self.path.join(&current_ref), &format!("{oid}\n"))?;

        tracing::info!(reference = %current_ref, oid = %oid, "reference updated");

        Ok(())
    }

    /// Replace a ref file atomically while holding `<ref>.lck`
    ///
    /// The new content goes to a temp file in the same directory and is
    /// renamed over the ref, so readers see either the old or the new value.
    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        let ref_dir = path
            .parent()
            .with_context(|| format!("ref file at {} has no parent directory", path.display()))?;
        std::fs::create_dir_all(ref_dir)
            .with_context(|| format!("failed to create {}", ref_dir.display()))?;

        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".lck");
        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file for {}", path.display()))?;
        let _guard = file_guard::lock(Box::new(lock_file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("failed to lock ref file at {}", path.display()))?;

        let mut temp_file = tempfile::NamedTempFile::new_in(ref_dir)
            .with_context(|| format!("failed to create temp ref file in {}", ref_dir.display()))?;
        temp_file
            .write_all(raw_ref.as_bytes())
            .with_context(|| format!("failed to write ref file at {}", path.display()))?;
        temp_file
            .persist(path)
            .with_context(|| format!("failed to replace ref file at {}", path.display()))?;

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }
}
