//! Three-way merge
//!
//! - `split_point`: the common ancestor the merge is computed against
//! - `resolution`: the per-file decision between split point, current and other version
//! - `outcome`: what a merge did, reported to the caller
//!
//! ## Debug Logging
//!
//! Build with `--features debug_merge` to trace every step of the split point search
//! on stderr. Per-file decisions are logged as `tracing` debug events
//! (`SPRIG_LOG=debug`).

/// Debug logging enabled by the `debug_merge` feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Processing commit {}", commit_id);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

pub mod outcome;
pub mod resolution;
pub mod split_point;
