//! Per-file merge decisions
//!
//! Each path touched by the split point, the current tip or the other tip is decided
//! on its own. A side counts as modified when it lacks the path that the split point
//! has (or the reverse) or records a different blob id.
//!
//! | current vs split | other vs split | decision |
//! |---|---|---|
//! | unmodified | absent | delete and stage the removal |
//! | unmodified | modified | take other's version and stage it |
//! | modified | unmodified | keep current |
//! | modified | modified, same result | keep current |
//! | modified | modified, different result | conflict |

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::{BufMut, BytesMut};

const CONFLICT_HEAD_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const CONFLICT_SEPARATOR: &[u8] = b"=======\n";
const CONFLICT_END_MARKER: &[u8] = b">>>>>>>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResolution {
    /// Leave the working file and the staging area alone
    Keep,
    /// Write other's version and stage it
    Take(ObjectId),
    /// Delete the working file and stage the removal
    Delete,
    /// Both sides changed the file differently; either side may have deleted it
    Conflict {
        current: Option<ObjectId>,
        other: Option<ObjectId>,
    },
}

impl FileResolution {
    pub fn resolve(
        split: Option<&ObjectId>,
        current: Option<&ObjectId>,
        other: Option<&ObjectId>,
    ) -> Self {
        let current_modified = split != current;
        let other_modified = split != other;

        match (current_modified, other_modified) {
            (_, false) => FileResolution::Keep,
            (false, true) => match other {
                Some(oid) => FileResolution::Take(oid.clone()),
                None => FileResolution::Delete,
            },
            (true, true) if current == other => FileResolution::Keep,
            (true, true) => FileResolution::Conflict {
                current: current.cloned(),
                other: other.cloned(),
            },
        }
    }
}

/// Content of a conflicted file: both versions between markers, empty for a deleted side
pub fn conflict_blob(current: Option<&Blob>, other: Option<&Blob>) -> Blob {
    let section = |blob: Option<&Blob>| blob.map(|blob| blob.content().clone()).unwrap_or_default();
    let current = section(current);
    let other = section(other);

    let mut content = BytesMut::with_capacity(
        CONFLICT_HEAD_MARKER.len()
            + current.len()
            + CONFLICT_SEPARATOR.len()
            + other.len()
            + CONFLICT_END_MARKER.len(),
    );
    content.put_slice(CONFLICT_HEAD_MARKER);
    content.put_slice(&current);
    content.put_slice(CONFLICT_SEPARATOR);
    content.put_slice(&other);
    content.put_slice(CONFLICT_END_MARKER);

    Blob::new(content.freeze())
}
