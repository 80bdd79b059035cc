use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;

impl Repository {
    /// Store the current index as a flat tree and return its digest
    pub fn write_tree(&self) -> anyhow::Result<ObjectId> {
        let mut index = self.index();
        index.rehydrate()?;

        self.store_tree(&index)
    }

    /// Fails with `UnsupportedNestedTree` if any staged path has a directory
    pub(crate) fn store_tree(&self, index: &Index) -> anyhow::Result<ObjectId> {
        let tree = Tree::build(index.entries())?;
        let tree_id = self.database().store(&tree)?;

        tracing::debug!(oid = %tree_id, entries = tree.len(), "tree written");

        Ok(tree_id)
    }

    pub fn print_write_tree(&self) -> anyhow::Result<()> {
        let tree_id = self.write_tree()?;
        writeln!(self.writer(), "{tree_id}")?;

        Ok(())
    }
}
