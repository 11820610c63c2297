use crate::areas::repository::Repository;
use crate::artifacts::log::ancestors::Ancestors;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the head commit and its first-parent ancestors, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        let head_oid = self.head_commit_id()?;

        for commit in Ancestors::first_parent(self.database(), head_oid) {
            self.show_commit(&commit?)?;
        }

        Ok(())
    }

    /// Print every commit in the object store, in id order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit in self.database().list_commits()? {
            self.show_commit(&commit)?;
        }

        Ok(())
    }

    /// Ids of every commit whose message is exactly `message`, printed one per line
    pub fn find(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        let matches = self
            .database()
            .list_commits()?
            .into_iter()
            .filter(|commit| commit.message() == message)
            .map(|commit| commit.id().clone())
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(RepositoryError::NoCommitWithMessage.into());
        }

        for oid in &matches {
            writeln!(self.writer(), "{}", oid)?;
        }

        Ok(matches)
    }

    fn show_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "===")?;
        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", commit.id()).yellow()
        )?;

        if commit.is_merge() {
            let parents = commit
                .parents()
                .iter()
                .map(ObjectId::to_short_oid)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.writer(), "Merge: {}", parents)?;
        }

        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }
}
