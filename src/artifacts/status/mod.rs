//! Working tree status
//!
//! - `file_change`: how a working file differs from the version the next commit would record
//! - `inspector`: per-path checks against the head commit and the staging area
//! - `status_info`: the full report printed by `status`

pub mod file_change;
pub mod inspector;
pub mod status_info;
