use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::path::Path;

impl Repository {
    /// Unstage `path`, and if the head commit tracks it, stage its removal and delete
    /// the working file
    pub fn rm(&mut self, path: &Path) -> anyhow::Result<()> {
        let path = self.workspace().relative_path(path)?;
        let tracked = self.head_commit()?.tracks(&path);
        let staged = self.index().is_staged(&path);

        if !tracked && !staged {
            return Err(if self.workspace().is_file(&path) {
                RepositoryError::NothingToRemove(path)
            } else {
                RepositoryError::FileNotFound(path)
            }
            .into());
        }

        self.index_mut().discard_add(&path);

        if tracked {
            self.workspace().remove_file(&path)?;
            self.index_mut().remove(path);
        }

        Ok(())
    }
}
