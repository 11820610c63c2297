//! User-facing repository operations
//!
//! Each command is an `impl Repository` block mutating the in-memory repository
//! state; the caller persists it afterwards.
//!
//! ## Commands
//!
//! - `init`: Create a repository with its root commit
//! - `add`: Stage a file for the next commit
//! - `rm`: Unstage a file or stage its removal
//! - `commit`: Record the staged changes
//! - `log`: Show first-parent history, every commit, or commits by message
//! - `status`: Show branches, staging area and working tree changes
//! - `checkout`: Switch branches or restore files
//! - `branch`: Create or delete branches
//! - `merge`: Merge another branch into the current one
//! - `reset`: Move the current branch to any commit

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
