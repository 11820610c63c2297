//! Repository handle and persisted state
//!
//! A [`Repository`] ties the object store, the working tree and the mutable
//! [`RepositoryState`] (branch table + staging area) together. Each operation mutates
//! the in-memory state; the caller writes it back with [`Repository::persist`] only once
//! the operation has succeeded, so a refused operation leaves the state on disk as it
//! was.
//!
//! ## Layout
//!
//! ```text
//! <root>/.sprig/objects/   object store
//! <root>/.sprig/state      JSON state record
//! <root>/.sprig/state.lock lock file guarding state reads and writes
//! ```

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{REPOSITORY_DIR, Workspace};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use fake::rand;
use file_guard::Lock;
use serde::{Deserialize, Serialize};
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "state";
const STATE_LOCK_FILE: &str = "state.lock";
const OBJECTS_DIR: &str = "objects";

/// Everything about a repository that is not an immutable object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    pub refs: Refs,
    pub index: Index,
}

impl RepositoryState {
    pub fn new(root: ObjectId) -> Self {
        RepositoryState {
            refs: Refs::new(root),
            index: Index::new(),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.refs.validate()?;
        self.index.validate()
    }
}

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    state: RepositoryState,
}

impl Repository {
    /// Load the repository rooted at `path`
    ///
    /// Fails with [`RepositoryError::NotInitialized`] if there is none.
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .map_err(|_| RepositoryError::NotInitialized)?;

        if !Self::state_path(&path).is_file() {
            return Err(RepositoryError::NotInitialized.into());
        }

        let state = Self::load_state(&path)?;

        Ok(Self::from_parts(path, writer, state))
    }

    /// Assemble a handle over an existing metadata directory, without touching disk
    pub(crate) fn from_parts(
        path: PathBuf,
        writer: Box<dyn std::io::Write>,
        state: RepositoryState,
    ) -> Self {
        Repository {
            database: Database::new(Self::objects_path(&path).into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            state,
        }
    }

    /// Write the state record back to disk
    ///
    /// The record is written to a temporary file and renamed over the old one while an
    /// exclusive lock is held on the lock file.
    pub fn persist(&self) -> anyhow::Result<()> {
        let metadata_path = Self::metadata_path(&self.path);
        let content = serde_json::to_vec_pretty(&self.state)
            .context("Failed to serialize repository state")?;

        let mut lock_file = Self::open_lock_file(&self.path)?;
        let _lock = file_guard::lock(&mut lock_file, Lock::Exclusive, 0, 1)
            .context("Failed to lock repository state")?;

        let temp_path = metadata_path.join(format!("state-{}.tmp", rand::random::<u32>()));
        let mut temp_file = std::fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        temp_file
            .write_all(&content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        temp_file.sync_all()?;

        std::fs::rename(&temp_path, Self::state_path(&self.path))
            .context("Failed to replace repository state")?;
        tracing::debug!(head = %self.state.refs.head(), "persisted repository state");

        Ok(())
    }

    fn load_state(path: &Path) -> anyhow::Result<RepositoryState> {
        let mut lock_file = Self::open_lock_file(path)?;
        let _lock = file_guard::lock(&mut lock_file, Lock::Shared, 0, 1)
            .context("Failed to lock repository state")?;

        let content = std::fs::read(Self::state_path(path))
            .context("Failed to read repository state")?;
        let state: RepositoryState =
            serde_json::from_slice(&content).context("Failed to parse repository state")?;
        state.validate()?;

        Ok(state)
    }

    fn open_lock_file(path: &Path) -> anyhow::Result<std::fs::File> {
        let lock_path = Self::metadata_path(path).join(STATE_LOCK_FILE);

        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open {}", lock_path.display()))
    }

    pub(crate) fn metadata_path(path: &Path) -> PathBuf {
        path.join(REPOSITORY_DIR)
    }

    pub(crate) fn objects_path(path: &Path) -> PathBuf {
        Self::metadata_path(path).join(OBJECTS_DIR)
    }

    fn state_path(path: &Path) -> PathBuf {
        Self::metadata_path(path).join(STATE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    pub fn refs(&self) -> &Refs {
        &self.state.refs
    }

    pub(crate) fn refs_mut(&mut self) -> &mut Refs {
        &mut self.state.refs
    }

    pub fn index(&self) -> &Index {
        &self.state.index
    }

    pub(crate) fn index_mut(&mut self) -> &mut Index {
        &mut self.state.index
    }

    pub fn head_commit_id(&self) -> anyhow::Result<ObjectId> {
        self.refs().read_head().cloned()
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(&self.head_commit_id()?)
    }
}
