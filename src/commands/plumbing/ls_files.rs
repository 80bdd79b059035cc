use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;

impl Repository {
    /// Staged entries in name order
    pub fn list_index(&self) -> anyhow::Result<Vec<IndexEntry>> {
        let mut index = self.index();
        index.rehydrate()?;

        Ok(index.entries().cloned().collect())
    }

    pub fn ls_files(&self, stage: bool) -> anyhow::Result<()> {
        for entry in self.list_index()? {
            if stage {
                writeln!(
                    self.writer(),
                    "{:6o} {} {}\t{}",
                    entry.mode(),
                    entry.oid(),
                    entry.stage(),
                    entry.name()
                )?;
            } else {
                writeln!(self.writer(), "{}", entry.name())?;
            }
        }

        Ok(())
    }
}
