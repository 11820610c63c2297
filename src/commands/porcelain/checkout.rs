use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Make `branch_name` the current branch and replace the working tree with its tip
    pub fn checkout_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let (branch_name, target_oid) = self.refs().resolve_branch(branch_name)?;
        if self.refs().is_current_branch(&branch_name) {
            return Err(RepositoryError::AlreadyOnBranch.into());
        }

        let target = self.database().load_commit(&target_oid)?;
        self.materialize(&target)?;
        self.refs_mut().set_head(branch_name.clone())?;

        writeln!(self.writer(), "Switched to branch '{}'", branch_name)?;

        Ok(())
    }

    /// Overwrite the working copy of `path` with its version in a commit (the head
    /// commit when none is given); the staging area is left alone
    pub fn restore_file(&self, commit_id: Option<&str>, path: &Path) -> anyhow::Result<()> {
        let path = self.workspace().relative_path(path)?;
        let commit = match commit_id {
            Some(commit_id) => {
                let oid = Revision::new(commit_id).resolve(self.database())?;
                self.database().load_commit(&oid)?
            }
            None => self.head_commit()?,
        };

        let blob_id = commit
            .file(&path)
            .ok_or_else(|| RepositoryError::FileNotInCommit(path.clone()))?;
        let blob = self.database().load_blob(blob_id)?;
        self.workspace().write_file(&path, blob.content())?;
        tracing::debug!(path = %path.display(), commit = %commit.id(), "restored file");

        Ok(())
    }

    /// Switch the working tree to `target` after the untracked-file check, and empty
    /// the staging area
    pub(crate) fn materialize(&mut self, target: &Commit) -> anyhow::Result<()> {
        {
            let mut migration = Migration::for_commit(self, target)?;
            migration.apply_changes()?;
        }
        self.index_mut().clear();

        Ok(())
    }
}
