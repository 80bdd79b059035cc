use crate::areas::repository::Repository;
use crate::artifacts::diff::patch::FilePatch;
use crate::artifacts::status::status_info::Status;
use colored::Colorize;

const FILE_SEPARATOR_WIDTH: usize = 70;

impl Repository {
    /// Unified diff lines from the staged blob to the working copy for every
    /// changed path, files separated by a rule
    pub fn diff(&self) -> anyhow::Result<Vec<String>> {
        let mut index = self.index();
        index.rehydrate()?;

        let status = Status::new(self.workspace()).initialize(&index)?;
        let mut lines = Vec::new();

        for path in &status.changed {
            let Some(entry) = index.entry_by_path(path) else {
                continue;
            };

            let staged = self.database().parse_object_as_blob(entry.oid())?;
            let live = self.workspace().parse_blob(path)?;
            let patch = FilePatch::new(path.clone(), staged.lines(), live.lines());

            let patch_lines = patch.lines();
            if patch_lines.is_empty() {
                continue;
            }

            if !lines.is_empty() {
                lines.push("-".repeat(FILE_SEPARATOR_WIDTH));
            }
            lines.extend(patch_lines);
        }

        Ok(lines)
    }

    pub fn print_diff(&self) -> anyhow::Result<()> {
        let separator = "-".repeat(FILE_SEPARATOR_WIDTH);

        for line in self.diff()? {
            let line = if line == separator {
                line.normal()
            } else if line.starts_with("@@") {
                line.cyan()
            } else if line.starts_with("---") || line.starts_with("+++") {
                line.bold()
            } else if line.starts_with('-') {
                line.red()
            } else if line.starts_with('+') {
                line.green()
            } else {
                line.normal()
            };

            writeln!(self.writer(), "{line}")?;
        }

        Ok(())
    }
}
