use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;

impl Repository {
    /// Create the metadata directory with an empty object store and a
    /// `HEAD` naming the default branch. Fails if a repository already exists.
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            anyhow::bail!("Repository already exists in {}", self.git_path().display());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        self.refs()
            .init_head()
            .context("Failed to create initial HEAD reference")?;

        tracing::info!(path = %self.path().display(), "repository initialized");

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
