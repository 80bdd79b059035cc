use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use derive_new::new;

/// Compares a staged entry with the live file at the same path
#[derive(new)]
pub struct Inspector<'w> {
    workspace: &'w Workspace,
}

impl Inspector<'_> {
    /// Whether the live content no longer hashes to the staged digest
    ///
    /// The blob digest is always recomputed, never persisted. Recorded
    /// metadata is not trusted to settle the answer.
    pub fn is_content_changed(&self, entry: &IndexEntry) -> anyhow::Result<bool> {
        let blob = self.workspace.parse_blob(entry.name())?;
        Ok(&blob.object_id()? != entry.oid())
    }
}
