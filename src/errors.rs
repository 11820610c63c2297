//! User-facing failures of repository operations
//!
//! Every operation returns `anyhow::Result`. When an operation is refused because of
//! the user's input or the repository's state, the error inside is a [`RepositoryError`],
//! so callers can branch on the kind with `downcast_ref`:
//!
//! ```rust,ignore
//! match repository.checkout_branch("feature") {
//!     Err(err) if matches!(
//!         err.downcast_ref::<RepositoryError>(),
//!         Some(RepositoryError::UntrackedFileConflict(_))
//!     ) => { /* ... */ }
//!     other => other?,
//! }
//! ```
//!
//! I/O and corruption failures are plain `anyhow` errors with context attached.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Not in an initialized sprig directory.")]
    NotInitialized,

    #[error("A sprig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingStaged,

    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No reason to remove the file: {}", .0.display())]
    NothingToRemove(PathBuf),

    #[error("No commit with that id exists: {0}")]
    NoSuchCommit(String),

    #[error("Commit id {prefix} is ambiguous, candidates: {}", .candidates.join(", "))]
    AmbiguousCommit {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("File does not exist in that commit: {}", .0.display())]
    FileNotInCommit(PathBuf),

    #[error("A branch with that name does not exist: {0}")]
    NoSuchBranch(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,

    #[error("A branch with that name already exists: {0}")]
    BranchExists(String),

    #[error("Invalid branch name: '{0}'")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,

    #[error(
        "There is an untracked file in the way; delete it, or add and commit it first.\n{}",
        format_paths(.0)
    )]
    UntrackedFileConflict(Vec<PathBuf>),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("\t{}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Look up the tag of a failed operation, if it was refused rather than broken
pub fn kind_of(error: &anyhow::Error) -> Option<&RepositoryError> {
    error.downcast_ref::<RepositoryError>()
}
