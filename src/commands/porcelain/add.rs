use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::RepositoryError;
use std::path::Path;

impl Repository {
    /// Stage the working file at `path` for the next commit
    ///
    /// Re-staging a file whose content matches the head commit only drops any pending
    /// change for it.
    pub fn add(&mut self, path: &Path) -> anyhow::Result<()> {
        let path = self.workspace().relative_path(path)?;
        if !self.workspace().is_file(&path) {
            return Err(RepositoryError::FileNotFound(path).into());
        }

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let head = self.head_commit()?;

        if head.file(&path) == Some(&blob_id) {
            tracing::debug!(path = %path.display(), "content matches head commit");
            let index = self.index_mut();
            index.discard_add(&path);
            index.discard_removal(&path);
        } else {
            self.database().store(&blob)?;
            self.index_mut().add(path, blob_id);
        }

        Ok(())
    }
}
