use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use colored::Colorize;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;

/// Snapshot of everything `status` reports, each list in ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub current_branch: BranchName,
    pub branches: Vec<BranchName>,
    pub staged_files: Vec<PathBuf>,
    pub removed_files: Vec<PathBuf>,
    pub workspace_changeset: ChangeSet,
    pub untracked_files: Vec<PathBuf>,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self) -> anyhow::Result<StatusInfo> {
        let head = self.repository.head_commit()?;
        let inspector = Inspector::new(self.repository, &head);
        let index = self.repository.index();

        let candidates = head
            .files()
            .keys()
            .chain(index.pending_adds().keys())
            .collect::<BTreeSet<_>>();

        let mut workspace_changeset = ChangeSet::new();
        for path in candidates {
            let change = inspector.check_workspace(path)?;
            if change != WorkspaceChangeType::None {
                workspace_changeset.insert(path.clone(), change);
            }
        }

        Ok(StatusInfo {
            current_branch: self.repository.refs().head().clone(),
            branches: self
                .repository
                .refs()
                .list_branches()
                .map(|(name, _)| name.clone())
                .collect(),
            staged_files: index.pending_adds().keys().cloned().collect(),
            removed_files: index.pending_removals().iter().cloned().collect(),
            workspace_changeset,
            untracked_files: inspector.untracked_files()?,
        })
    }
}

impl std::fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", "=== Branches ===".bold())?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(f, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(f, "{branch}")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Staged Files ===".bold())?;
        for path in &self.staged_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Removed Files ===".bold())?;
        for path in &self.removed_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Modifications Not Staged For Commit ===".bold())?;
        for (path, change) in &self.workspace_changeset {
            writeln!(f, "{} {}", path.display(), change)?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Untracked Files ===".bold())?;
        for path in &self.untracked_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)
    }
}
