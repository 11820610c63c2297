use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::Inspector;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    /// Print branches, staged and removed files, unstaged modifications and untracked files
    pub fn status(&self) -> anyhow::Result<()> {
        let status_info = self.status_info()?;
        write!(self.writer(), "{}", status_info)?;

        Ok(())
    }

    pub fn status_info(&self) -> anyhow::Result<StatusInfo> {
        Status::new(self).initialize()
    }

    /// Working files the next commit would not record
    pub fn untracked_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let head = self.head_commit()?;
        Inspector::new(self, &head).untracked_files()
    }
}
