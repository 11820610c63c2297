//! Version-control data structures and algorithms
//!
//! - `branch`: Branch names and abbreviated commit ids
//! - `checkout`: Working tree migrations and the untracked-file check
//! - `log`: Commit history traversal
//! - `merge`: Split point search and per-file reconciliation
//! - `objects`: Stored object types (blob, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
