//! sprig: a local, single-user version-control engine
//!
//! A repository keeps content-addressed commits and blobs in `.sprig/objects`, and a
//! small JSON state record (branch table plus staging area) in `.sprig/state`. Every
//! operation is a method on [`areas::repository::Repository`]; callers run one
//! operation and then [`persist`](areas::repository::Repository::persist) the state.
//!
//! ```rust,no_run
//! use sprig::areas::repository::Repository;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut repository = Repository::open(Path::new("."), Box::new(std::io::stdout()))?;
//! repository.add(Path::new("notes.txt"))?;
//! repository.commit("add notes")?;
//! repository.persist()?;
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
