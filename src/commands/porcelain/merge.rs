use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::outcome::MergeOutcome;
use crate::artifacts::merge::resolution::{FileResolution, conflict_blob};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

/// Staging change produced by reconciliation: a blob to stage, or a removal
type StagedChange = (PathBuf, Option<ObjectId>);

impl Repository {
    /// Merge the tip of `branch_name` into the current branch
    pub fn merge(&mut self, branch_name: &str) -> anyhow::Result<MergeOutcome> {
        if !self.index().is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }

        let (other_branch, other_oid) = self.refs().resolve_branch(branch_name)?;
        if self.refs().is_current_branch(&other_branch) {
            return Err(RepositoryError::SelfMerge.into());
        }

        let head_oid = self.head_commit_id()?;
        let split_oid = SplitPointFinder::new(self.database()).find(&head_oid, &other_oid)?;

        let outcome = if split_oid == other_oid {
            MergeOutcome::GivenIsAncestor
        } else if split_oid == head_oid {
            let target = self.database().load_commit(&other_oid)?;
            self.materialize(&target)?;
            self.refs_mut().update_head(other_oid.clone());

            MergeOutcome::FastForwarded(other_oid)
        } else {
            let split = self.database().load_commit(&split_oid)?;
            let other = self.database().load_commit(&other_oid)?;
            let (staged_changes, conflicts) = self.reconcile(&split, &other)?;

            let index = self.index_mut();
            for (path, blob_id) in staged_changes {
                match blob_id {
                    Some(blob_id) => index.add(path, blob_id),
                    None => index.remove(path),
                }
            }

            let message = format!("Merged {} into {}.", other_branch, self.refs().head());
            let commit = self.write_commit(&message, vec![other_oid])?;

            MergeOutcome::Merged {
                commit: commit.id().clone(),
                conflicts,
            }
        };

        tracing::info!(branch = %other_branch, outcome = ?outcome, "merged");
        if let Some(notice) = outcome.notice() {
            writeln!(self.writer(), "{}", notice)?;
        }

        Ok(outcome)
    }

    /// Decide every path touched by the split point or either tip, then update the
    /// working tree in one migration
    fn reconcile(
        &self,
        split: &Commit,
        other: &Commit,
    ) -> anyhow::Result<(Vec<StagedChange>, Vec<PathBuf>)> {
        let current = self.head_commit()?;
        let mut migration = Migration::new(self)?;
        let mut staged_changes = Vec::new();
        let mut conflicts = Vec::new();

        let paths = split
            .files()
            .keys()
            .chain(current.files().keys())
            .chain(other.files().keys())
            .collect::<BTreeSet<_>>();

        for path in paths {
            let resolution =
                FileResolution::resolve(split.file(path), current.file(path), other.file(path));
            tracing::debug!(path = %path.display(), resolution = ?resolution, "reconciled file");

            match resolution {
                FileResolution::Keep => {}
                FileResolution::Take(blob_id) => {
                    migration.write(path.clone(), blob_id.clone());
                    staged_changes.push((path.clone(), Some(blob_id)));
                }
                FileResolution::Delete => {
                    migration.delete(path.clone());
                    staged_changes.push((path.clone(), None));
                }
                FileResolution::Conflict {
                    current: current_id,
                    other: other_id,
                } => {
                    let current_blob = current_id
                        .map(|oid| self.database().load_blob(&oid))
                        .transpose()?;
                    let other_blob = other_id
                        .map(|oid| self.database().load_blob(&oid))
                        .transpose()?;
                    let blob = conflict_blob(current_blob.as_ref(), other_blob.as_ref());

                    let blob_id = migration.write_blob(path.clone(), blob)?;
                    staged_changes.push((path.clone(), Some(blob_id)));
                    conflicts.push(path.clone());
                }
            }
        }

        migration.apply_changes()?;

        Ok((staged_changes, conflicts))
    }
}
