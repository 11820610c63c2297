//! Command implementations
//!
//! - `porcelain`: the operations behind each CLI subcommand (add, commit, merge, etc.)

pub mod porcelain;
