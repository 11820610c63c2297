//! Staging area
//!
//! Holds the changes that will make up the next commit:
//!
//! - `pending_adds`: paths whose current content was stored as a blob and will be
//!   recorded (or updated) in the next commit
//! - `pending_removals`: tracked paths the next commit will stop tracking
//!
//! A path is never in both sets. The staging area is emptied whenever a commit is
//! produced or the working tree is switched to another commit.

use crate::artifacts::objects::object_id::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pending_adds: BTreeMap<PathBuf, ObjectId>,
    pending_removals: BTreeSet<PathBuf>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the disjointness invariant after loading from disk
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(path) = self
            .pending_removals
            .iter()
            .find(|path| self.pending_adds.contains_key(*path))
        {
            anyhow::bail!(
                "corrupt repository state: {} is both staged and removed",
                path.display()
            );
        }

        Ok(())
    }

    /// Stage `path` with content `oid` for the next commit
    pub fn add(&mut self, path: PathBuf, oid: ObjectId) {
        tracing::debug!(path = %path.display(), oid = %oid, "staged file");
        self.pending_removals.remove(&path);
        self.pending_adds.insert(path, oid);
    }

    /// Drop a pending addition, returning whether there was one
    pub fn discard_add(&mut self, path: &Path) -> bool {
        self.pending_adds.remove(path).is_some()
    }

    /// Mark a tracked path as removed in the next commit
    pub fn remove(&mut self, path: PathBuf) {
        tracing::debug!(path = %path.display(), "staged removal");
        self.pending_adds.remove(&path);
        self.pending_removals.insert(path);
    }

    /// Cancel a pending removal, returning whether there was one
    pub fn discard_removal(&mut self, path: &Path) -> bool {
        self.pending_removals.remove(path)
    }

    pub fn clear(&mut self) {
        self.pending_adds.clear();
        self.pending_removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending_adds.is_empty() && self.pending_removals.is_empty()
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&ObjectId> {
        self.pending_adds.get(path)
    }

    pub fn is_staged(&self, path: &Path) -> bool {
        self.pending_adds.contains_key(path)
    }

    pub fn is_removed(&self, path: &Path) -> bool {
        self.pending_removals.contains(path)
    }

    pub fn pending_adds(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.pending_adds
    }

    pub fn pending_removals(&self) -> &BTreeSet<PathBuf> {
        &self.pending_removals
    }
}
