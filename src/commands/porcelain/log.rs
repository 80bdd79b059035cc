use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

impl Repository {
    /// Commits reachable from the branch head through `parent` links, newest
    /// first; empty before the first commit
    pub fn history(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();
        let mut curr_commit_oid = self.refs().read_head()?;

        while let Some(commit_oid) = curr_commit_oid {
            let commit = self.database().parse_object_as_commit(&commit_oid)?;

            // Move to the parent commit for the next iteration
            curr_commit_oid = commit.parent().cloned();
            commits.push((commit_oid, commit));
        }

        Ok(commits)
    }

    pub fn log(&self) -> anyhow::Result<()> {
        for (position, (commit_oid, commit)) in self.history()?.iter().enumerate() {
            if position > 0 {
                writeln!(self.writer())?;
            }

            self.show_commit_medium(commit_oid, commit)?;
        }

        Ok(())
    }

    fn show_commit_medium(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}",
            format!("commit {commit_oid}").yellow()
        )?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {message_line}")?;
        }

        Ok(())
    }
}
