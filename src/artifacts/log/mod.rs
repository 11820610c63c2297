//! Commit history traversal
//!
//! - `ancestors`: lazy walk over parent links, either first parents only (what `log`
//!   prints and what the merge base is computed from) or every parent breadth-first

pub mod ancestors;
