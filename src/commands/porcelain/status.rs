use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use colored::{Color, Colorize};

impl Repository {
    /// Classify every tracked and live path as changed, new or deleted
    ///
    /// Read-only: the index file is not rewritten.
    pub fn status(&self) -> anyhow::Result<StatusInfo> {
        let mut index = self.index();
        index.rehydrate()?;

        Status::new(self.workspace()).initialize(&index)
    }

    pub fn print_status(&self) -> anyhow::Result<()> {
        let status = self.status()?;

        let sections = [
            ("changed files:", &status.changed, Color::Yellow),
            ("new files:", &status.new, Color::Green),
            ("deleted files:", &status.deleted, Color::Red),
        ];

        for (title, paths, color) in sections {
            if paths.is_empty() {
                continue;
            }

            writeln!(self.writer(), "{title}")?;
            for path in paths {
                writeln!(self.writer(), "    {}", path.color(color))?;
            }
        }

        Ok(())
    }
}
