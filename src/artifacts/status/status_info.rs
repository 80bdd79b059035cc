use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::BTreeSet;

/// Classification of every path seen in the index or the working directory
///
/// Each list is sorted and a path appears in at most one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Tracked paths whose live content differs from the staged blob
    pub changed: Vec<String>,
    /// Live paths the index does not track
    pub new: Vec<String>,
    /// Tracked paths missing from the working directory
    pub deleted: Vec<String>,
}

impl StatusInfo {
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.new.is_empty() && self.deleted.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    workspace: &'r Workspace,
}

impl Status<'_> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let live_files = self.workspace.list_files()?.into_iter().collect::<BTreeSet<_>>();
        let inspector = Inspector::new(self.workspace);

        let mut status = StatusInfo::default();

        for entry in index.entries() {
            if !live_files.contains(entry.name()) {
                status.deleted.push(entry.name().to_string());
                continue;
            }

            if inspector.is_content_changed(entry)? {
                status.changed.push(entry.name().to_string());
            }
        }

        status.new = live_files
            .into_iter()
            .filter(|path| index.entry_by_path(path).is_none())
            .collect();

        tracing::debug!(
            changed = status.changed.len(),
            new = status.new.len(),
            deleted = status.deleted.len(),
            "status computed"
        );

        Ok(status)
    }
}
