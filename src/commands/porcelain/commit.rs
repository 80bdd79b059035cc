use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Record the staged tree as a new commit on the branch and move the
    /// branch to it
    ///
    /// The current branch head becomes the parent; without one this is the
    /// root commit. `author` is an explicit `"Name <email>"` identity,
    /// otherwise the environment or the default identity is used.
    pub fn commit(&self, message: &str, author: Option<&str>) -> anyhow::Result<ObjectId> {
        let author = Author::resolve(author)?;

        let mut index = self.index();
        let _lock = index.lock()?;

        // Load the index file from the disk
        index.rehydrate()?;
        let tree_id = self.store_tree(&index)?;

        let parent = self.refs().read_head()?;
        let commit = Commit::new(parent, tree_id, author, message.to_string());
        let commit_id = self.database().store(&commit)?;

        self.refs().update_head(&commit_id)?;

        tracing::info!(
            oid = %commit_id,
            parent = ?commit.parent().map(ObjectId::to_short_oid),
            "commit created"
        );

        Ok(commit_id)
    }

    pub fn print_commit(&self, message: &str, author: Option<&str>) -> anyhow::Result<()> {
        let commit_id = self.commit(message, author)?;

        writeln!(
            self.writer(),
            "committed to {}: {}",
            self.refs().current_branch()?,
            commit_id.to_short_oid()
        )?;

        Ok(())
    }
}
