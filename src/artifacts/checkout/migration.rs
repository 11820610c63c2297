//! Planned working tree changes
//!
//! A migration collects one [`Action`] per path, in path order. Plans come from two
//! places:
//!
//! 1. [`Migration::for_commit`] plans a full switch to a target commit: every working
//!    file the target does not track is deleted and every target file whose working
//!    copy differs is written.
//! 2. The merge engine records individual writes and deletes, including conflict
//!    files whose blobs only exist in memory until the plan is applied.
//!
//! ## Safety
//!
//! [`Migration::apply_changes`] first checks every action against the untracked
//! working files (those neither tracked by the head commit nor staged for addition).
//! If any would be overwritten or removed, it fails with
//! [`RepositoryError::UntrackedFileConflict`] before touching the object store or the
//! working tree.

use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::{ConflictMessage, ConflictType};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::RepositoryError;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// File system action planned for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the working file with this blob's content
    Write(ObjectId),
    /// Delete the working file
    Delete,
}

/// Set of detected conflicts grouped by type
pub type ConflictsSet = BTreeMap<ConflictType, Vec<PathBuf>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    /// Commit the working tree currently reflects
    head: Commit,
    /// Planned actions, in path order
    actions: BTreeMap<PathBuf, Action>,
    /// Blobs written by the plan that are not in the object store yet
    pending_blobs: HashMap<ObjectId, Blob>,
    conflicts: ConflictsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository) -> anyhow::Result<Self> {
        Ok(Self {
            repository,
            head: repository.head_commit()?,
            actions: BTreeMap::new(),
            pending_blobs: HashMap::new(),
            conflicts: ConflictsSet::new(),
        })
    }

    /// Plan the switch of the whole working tree to `target`
    pub fn for_commit(repository: &'r Repository, target: &Commit) -> anyhow::Result<Self> {
        let mut migration = Self::new(repository)?;

        for path in repository.workspace().list_files()? {
            if !target.tracks(&path) {
                migration.delete(path);
            }
        }

        let inspector = Inspector::new(repository, &migration.head);
        let mut writes = Vec::new();
        for (path, oid) in target.files() {
            if inspector.workspace_oid(path)?.as_ref() != Some(oid) {
                writes.push((path.clone(), oid.clone()));
            }
        }
        for (path, oid) in writes {
            migration.write(path, oid);
        }

        tracing::debug!(
            target = %target.id(),
            actions = migration.actions.len(),
            "planned checkout"
        );

        Ok(migration)
    }

    pub fn write(&mut self, path: PathBuf, oid: ObjectId) {
        self.actions.insert(path, Action::Write(oid));
    }

    /// Plan a write of content that is not stored yet, returning its blob id
    pub fn write_blob(&mut self, path: PathBuf, blob: Blob) -> anyhow::Result<ObjectId> {
        let oid = blob.object_id()?;
        self.pending_blobs.insert(oid.clone(), blob);
        self.write(path, oid.clone());

        Ok(oid)
    }

    pub fn delete(&mut self, path: PathBuf) {
        self.actions.insert(path, Action::Delete);
    }

    pub fn actions(&self) -> impl Iterator<Item = (&PathBuf, &Action)> {
        self.actions.iter()
    }

    /// Content for a planned write, from the plan itself or the object store
    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        match self.pending_blobs.get(object_id) {
            Some(blob) => Ok(blob.clone()),
            None => self.repository.database().load_blob(object_id),
        }
    }

    /// Run the untracked-file check, then store pending blobs and update the working tree
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.check_for_conflicts()?;

        for blob in self.pending_blobs.values() {
            self.repository.database().store(blob)?;
        }
        self.repository.workspace().apply_migration(self)?;

        Ok(())
    }

    /// Fails with [`RepositoryError::UntrackedFileConflict`] if the plan clobbers an
    /// untracked working file
    pub fn check_for_conflicts(&mut self) -> anyhow::Result<()> {
        self.conflicts.clear();
        let inspector = Inspector::new(self.repository, &self.head);

        for (path, action) in &self.actions {
            if !inspector.is_untracked(path) {
                continue;
            }

            let clobbered = match (action, inspector.workspace_oid(path)?) {
                (_, None) => false,
                (Action::Write(oid), Some(current)) => oid != &current,
                (Action::Delete, Some(_)) => true,
            };

            if clobbered {
                self.conflicts
                    .entry(ConflictType::get_conflict_type(action))
                    .or_default()
                    .push(path.clone());
            }
        }

        if self.conflicts.is_empty() {
            return Ok(());
        }

        for (conflict_type, paths) in &self.conflicts {
            let ConflictMessage { header } = conflict_type.into();
            for path in paths {
                tracing::debug!(path = %path.display(), "{header}");
            }
        }

        let mut paths = self.conflicts.values().flatten().cloned().collect::<Vec<_>>();
        paths.sort();

        Err(RepositoryError::UntrackedFileConflict(paths).into())
    }
}
