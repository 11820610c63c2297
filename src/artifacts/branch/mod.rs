//! Branch names and commit id resolution
//!
//! - `branch_name`: validated branch names
//! - `revision`: resolving full or abbreviated commit ids against the object store

pub mod branch_name;
pub mod revision;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|^-|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Shortest abbreviated commit id accepted
pub const MIN_REVISION_LENGTH: usize = 4;
