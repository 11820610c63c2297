use crate::artifacts::checkout::migration::{Action, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the metadata directory inside the working tree
pub const REPOSITORY_DIR: &str = ".sprig";

const IGNORED_PATHS: [&str; 3] = [REPOSITORY_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file in the working tree, relative to its root, in path order
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .unwrap_or(entry.path());
                !Self::is_ignored(relative)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        // Check if any component of the path is in IGNORED_PATHS
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    /// Normalize a user-supplied path into one relative to the working tree root
    ///
    /// Relative paths are taken as relative to the root. Paths that climb out of the
    /// root or point inside the metadata directory are refused.
    pub fn relative_path(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let relative = if path.is_absolute() {
            let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            absolute
                .strip_prefix(self.path.as_ref())
                .map(Path::to_path_buf)
                .map_err(|_| RepositoryError::FileNotFound(path.to_path_buf()))?
        } else {
            path.components()
                .filter(|component| !matches!(component, std::path::Component::CurDir))
                .collect::<PathBuf>()
        };

        let escapes_root = relative
            .components()
            .any(|component| !matches!(component, std::path::Component::Normal(_)));

        if relative.as_os_str().is_empty() || escapes_root || Self::is_ignored(&relative) {
            return Err(RepositoryError::FileNotFound(path.to_path_buf()).into());
        }

        Ok(relative)
    }

    pub fn is_file(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        if !self.is_file(file_path) {
            return Err(RepositoryError::FileNotFound(file_path.to_path_buf()).into());
        }

        let content = std::fs::read(self.path.join(file_path))
            .with_context(|| format!("Unable to read {}", file_path.display()))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Replace the file's content, creating parent directories as needed
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directories for {:?}", file_path)
            })?;
        }

        // a directory standing where the file goes is replaced
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", file_path))?;
        }

        std::fs::write(&path, data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete a file and any parent directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(&path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("failed to remove empty directory at {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // The order of applying migrations is important: deletions run first so a
    // directory that gives way to a file (or the reverse) is cleared before writing.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, action) in migration.actions() {
            if let Action::Delete = action {
                self.remove_file(file_path)?;
            }
        }

        for (file_path, action) in migration.actions() {
            if let Action::Write(blob_id) = action {
                let blob = migration.load_blob(blob_id)?;
                self.write_file(file_path, blob.content())?;
            }
        }

        Ok(())
    }
}
