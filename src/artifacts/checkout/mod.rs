//! Working tree materialization
//!
//! Switching the working tree to another commit (checkout, reset, fast-forward) or
//! applying a merge plan goes through a [`migration::Migration`]: every file action is
//! planned first, the plan is checked against untracked working files, and only then
//! are files deleted and written. A refused migration touches nothing.

pub mod conflict;
pub mod migration;
