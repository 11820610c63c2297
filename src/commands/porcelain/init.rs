use crate::areas::database::Database;
use crate::areas::repository::{Repository, RepositoryState};
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Create a repository at `path` holding only the root commit on the default branch
    ///
    /// Fails with [`RepositoryError::AlreadyInitialized`] if one already exists there.
    pub fn init(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;

        if Self::metadata_path(&path).exists() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        let database = Database::new(Self::objects_path(&path).into_boxed_path());
        fs::create_dir_all(database.objects_path())
            .context("Failed to create .sprig/objects directory")?;
        let root_id = database
            .store(&Commit::root()?)
            .context("Failed to store the root commit")?;

        let repository = Self::from_parts(path, writer, RepositoryState::new(root_id));
        repository.persist()?;
        tracing::info!(path = %repository.path().display(), "initialized repository");

        writeln!(
            repository.writer(),
            "Initialized empty sprig repository in {}",
            repository.path().display()
        )?;

        Ok(repository)
    }
}
