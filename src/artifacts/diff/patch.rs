use crate::artifacts::diff::diff_algorithm::{DiffAlgorithm, MyersDiff};
use crate::artifacts::diff::hunk::Hunk;
use derive_new::new;

/// Line-level comparison of the staged and live content of one path
#[derive(Debug, Clone, new)]
pub struct FilePatch {
    path: String,
    index_lines: Vec<String>,
    workspace_lines: Vec<String>,
}

impl FilePatch {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn hunks(&self) -> Vec<Hunk<String>> {
        Hunk::filter(&MyersDiff::new(&self.index_lines, &self.workspace_lines).diff())
    }

    /// Unified diff lines, starting with the `---`/`+++` header
    ///
    /// Empty when both sides hold the same lines.
    pub fn lines(&self) -> Vec<String> {
        let hunks = self.hunks();
        if hunks.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![
            format!("--- {} (index)", self.path),
            format!("+++ {} (working copy)", self.path),
        ];
        for hunk in hunks {
            lines.push(hunk.header());
            lines.extend(hunk.edits().iter().map(ToString::to_string));
        }

        lines
    }
}
