use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Record the staged changes as a new commit on the current branch
    pub fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        let commit = self.write_commit(message, Vec::new())?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.refs().head(),
            commit.id().to_short_oid(),
            commit.message().lines().next().unwrap_or_default()
        )?;

        Ok(commit.id().clone())
    }

    /// Build, store and check out a commit from the head commit and the staging area
    ///
    /// Parents are the head commit followed by `extra_parents`. An empty staging area
    /// is refused with [`RepositoryError::NothingStaged`], merges included.
    pub(crate) fn write_commit(
        &mut self,
        message: &str,
        extra_parents: Vec<ObjectId>,
    ) -> anyhow::Result<Commit> {
        let message = message.trim();
        if message.is_empty() {
            return Err(RepositoryError::EmptyMessage.into());
        }
        if self.index().is_empty() {
            return Err(RepositoryError::NothingStaged.into());
        }

        let head = self.head_commit()?;
        let mut files = head.files().clone();
        files.extend(
            self.index()
                .pending_adds()
                .iter()
                .map(|(path, oid)| (path.clone(), oid.clone())),
        );
        for path in self.index().pending_removals() {
            files.remove(path);
        }

        let parents = std::iter::once(head.id().clone())
            .chain(extra_parents)
            .collect::<Vec<_>>();
        let commit = Commit::create(message, parents, files)?;
        let commit_id = self.database().store(&commit)?;

        self.refs_mut().update_head(commit_id);
        self.index_mut().clear();
        tracing::info!(oid = %commit.id(), files = commit.files().len(), "created commit");

        Ok(commit)
    }
}
