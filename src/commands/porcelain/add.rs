use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_type::ObjectType;

impl Repository {
    /// Stage `paths`, expanding directories, and return the staged paths
    ///
    /// Each file is stored as a blob and recorded with its current metadata,
    /// replacing any previous entry. The index is rewritten once, under the
    /// index lock. Fails with `PathNotFound` before anything is staged if a
    /// path does not exist.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<Vec<String>> {
        let files = self.workspace().expand_paths(paths)?;

        let mut index = self.index();
        let _lock = index.lock()?;

        // Load the index file from the disk
        index.rehydrate()?;

        for path in &files {
            let data = self.workspace().read_file(path)?;
            let mut stat = self.workspace().stat_file(path)?;
            // record the size of the bytes actually hashed
            stat.size = data.len() as u32;

            let blob_id = self.database().hash_object(&data, ObjectType::Blob, true)?;
            index.add(IndexEntry::try_new(path.as_str(), blob_id, stat)?);
        }

        index.write_updates()?;
        tracing::info!(files = files.len(), "files staged");

        Ok(files)
    }
}
