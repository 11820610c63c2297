use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
    head: &'r Commit,
}

impl<'r> Inspector<'r> {
    /// Blob id the working file would get if it were staged now
    pub fn workspace_oid(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !self.repository.workspace().is_file(path) {
            return Ok(None);
        }

        let blob = self.repository.workspace().parse_blob(path)?;
        Ok(Some(blob.object_id()?))
    }

    /// Neither tracked by the head commit nor staged for addition
    pub fn is_untracked(&self, path: &Path) -> bool {
        !self.head.tracks(path) && !self.repository.index().is_staged(path)
    }

    /// Compare a working file with the version the next commit would record for it
    pub fn check_workspace(&self, path: &Path) -> anyhow::Result<WorkspaceChangeType> {
        let index = self.repository.index();

        let expected = match index.entry_by_path(path) {
            Some(oid) => oid,
            None if index.is_removed(path) => return Ok(WorkspaceChangeType::None),
            None => match self.head.file(path) {
                Some(oid) => oid,
                None => return Ok(WorkspaceChangeType::None),
            },
        };

        match self.workspace_oid(path)? {
            None => Ok(WorkspaceChangeType::Deleted),
            Some(oid) if &oid != expected => Ok(WorkspaceChangeType::Modified),
            Some(_) => Ok(WorkspaceChangeType::None),
        }
    }

    /// Working files the next commit would not record
    ///
    /// Includes files staged for removal that were re-created in the working tree.
    pub fn untracked_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let index = self.repository.index();

        Ok(self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|path| self.is_untracked(path) || index.is_removed(path))
            .collect())
    }
}
