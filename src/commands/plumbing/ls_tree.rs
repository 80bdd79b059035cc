use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepositoryError;

impl Repository {
    /// Resolve `prefix` to a tree; a commit resolves to its root tree
    pub fn read_tree(&self, prefix: &str) -> anyhow::Result<Tree> {
        let object_id = self.database().resolve_prefix(prefix)?;

        match self.database().load(&object_id)?.0 {
            ObjectType::Tree => self.database().parse_object_as_tree(&object_id),
            ObjectType::Commit => {
                let commit = self.database().parse_object_as_commit(&object_id)?;
                self.database().parse_object_as_tree(commit.tree_oid())
            }
            found => Err(RepositoryError::UnexpectedObjectType {
                expected: ObjectType::Tree,
                found,
            }
            .into()),
        }
    }

    pub fn ls_tree(&self, prefix: &str) -> anyhow::Result<()> {
        let tree = self.read_tree(prefix)?;

        for entry in tree.entries() {
            writeln!(
                self.writer(),
                "{:06o} {} {}\t{}",
                entry.mode(),
                entry.object_type(),
                entry.oid(),
                entry.name()
            )?;
        }

        Ok(())
    }
}
