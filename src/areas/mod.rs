//! Core repository components
//!
//! - `database`: Object store for blobs and commits
//! - `index`: Staging area for the next commit
//! - `refs`: Branch table and the current branch
//! - `repository`: Repository handle and the persisted state record
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
