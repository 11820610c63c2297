use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

/// Result of a merge that was carried out
///
/// None of these are failures; refusals are reported as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The other branch is already contained in the current one; nothing changed
    GivenIsAncestor,
    /// The current branch was moved to the other tip without a new commit
    FastForwarded(ObjectId),
    /// A merge commit was recorded, possibly with conflict files in it
    Merged {
        commit: ObjectId,
        conflicts: Vec<PathBuf>,
    },
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        matches!(self, MergeOutcome::Merged { conflicts, .. } if !conflicts.is_empty())
    }

    /// Line printed for the user, if any
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            MergeOutcome::GivenIsAncestor => {
                Some("Given branch is an ancestor of the current branch.")
            }
            MergeOutcome::FastForwarded(_) => Some("Current branch fast-forwarded."),
            MergeOutcome::Merged { .. } if self.has_conflicts() => {
                Some("Encountered a merge conflict.")
            }
            MergeOutcome::Merged { .. } => None,
        }
    }
}
