use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

impl Repository {
    /// Digest `data` as an object of `object_type`, storing it when `persist` is set
    pub fn hash_object(
        &self,
        data: &[u8],
        object_type: ObjectType,
        persist: bool,
    ) -> anyhow::Result<ObjectId> {
        self.database().hash_object(data, object_type, persist)
    }

    pub fn print_hash_object(
        &self,
        object_path: &str,
        object_type: ObjectType,
        write: bool,
    ) -> anyhow::Result<()> {
        // read object file
        let object_data = self.workspace().read_file(object_path)?;

        let object_id = self.hash_object(&object_data, object_type, write)?;

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
