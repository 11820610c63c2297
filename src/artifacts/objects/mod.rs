//! Stored object types
//!
//! Everything the repository remembers is an immutable object identified by the SHA-1
//! hash of its serialized form. There are two kinds:
//!
//! - **Blob**: the raw bytes of one version of one file
//! - **Commit**: a snapshot record with message, timestamp, parents and a path-to-blob map
//!
//! All objects implement serialization/deserialization for the object format:
//! `<type> <size>\0<payload>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated form of an object id
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
