use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::blob::Blob;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const IGNORED_PATHS: [&str; 1] = [".git"];

/// The working directory: external, user-owned, only ever read
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, file_path: &str) -> anyhow::Result<Blob> {
        let data = self.read_file(file_path)?;
        Ok(Blob::new(data))
    }

    /// Every regular file below the working directory, as sorted
    /// `/`-separated relative paths. The metadata directory is skipped.
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        self.list_files_under(&self.path)
    }

    /// Resolve `add` arguments to the files they name
    ///
    /// Directories expand to the files beneath them. Backslashes are treated
    /// as separators. Fails with `PathNotFound` on the first missing path.
    pub fn expand_paths(&self, paths: &[String]) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();

        for path in paths {
            let relative = path.replace('\\', "/");
            if relative.split('/').any(|name| IGNORED_PATHS.contains(&name)) {
                continue;
            }
            let absolute = self.path.join(&relative);

            if absolute.is_dir() {
                files.extend(self.list_files_under(&absolute)?);
            } else if absolute.is_file() {
                files.push(self.relative_name(&absolute)?);
            } else {
                return Err(RepositoryError::PathNotFound(relative).into());
            }
        }

        files.sort();
        files.dedup();

        Ok(files)
    }

    fn list_files_under(&self, root: &Path) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry));

        for entry in walker {
            let entry = entry.with_context(|| format!("Unable to list files under {}", root.display()))?;
            if entry.file_type().is_file() {
                files.push(self.relative_name(entry.path())?);
            }
        }

        // walkdir orders siblings only, the index orders whole paths bytewise
        files.sort();

        Ok(files)
    }

    fn is_ignored(entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && IGNORED_PATHS.contains(&entry.file_name().to_string_lossy().as_ref())
    }

    /// `/`-joined path relative to the working directory
    fn relative_name(&self, path: &Path) -> anyhow::Result<String> {
        let relative = path
            .strip_prefix(self.path.as_ref())
            .with_context(|| format!("{} is outside the working directory", path.display()))?;

        let components = relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => Ok(Some(name.to_string_lossy().into_owned())),
                Component::CurDir => Ok(None),
                _ => Err(anyhow::anyhow!(
                    "{} is outside the working directory",
                    path.display()
                )),
            })
            .filter_map(Result::transpose)
            .collect::<anyhow::Result<Vec<_>>>()?;

        if components.is_empty() {
            anyhow::bail!("{} does not name a file", path.display());
        }

        Ok(components.join("/"))
    }

    pub fn file_path(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    pub fn read_file(&self, file_path: &str) -> anyhow::Result<Bytes> {
        let content = std::fs::read(self.file_path(file_path))
            .with_context(|| format!("Failed to read file: {file_path}"))?;

        Ok(Bytes::from(content))
    }

    pub fn stat_file(&self, file_path: &str) -> anyhow::Result<EntryMetadata> {
        let path = self.file_path(file_path);
        let metadata = std::fs::metadata(&path)
            .with_context(|| format!("Failed to get metadata for file: {file_path}"))?;

        (path.as_path(), metadata).try_into()
    }
}
