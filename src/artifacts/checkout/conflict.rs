use crate::artifacts::checkout::migration::Action;

#[derive(Debug)]
pub struct ConflictMessage {
    pub header: &'static str,
}

impl From<&ConflictType> for ConflictMessage {
    fn from(value: &ConflictType) -> Self {
        match value {
            ConflictType::UntrackedOverwritten => Self {
                header: "untracked working tree file would be overwritten",
            },
            ConflictType::UntrackedRemoved => Self {
                header: "untracked working tree file would be removed",
            },
        }
    }
}

/// Ways a planned action can clobber an untracked working file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    UntrackedOverwritten,
    UntrackedRemoved,
}

impl ConflictType {
    pub fn get_conflict_type(action: &Action) -> ConflictType {
        match action {
            Action::Write(_) => ConflictType::UntrackedOverwritten,
            Action::Delete => ConflictType::UntrackedRemoved,
        }
    }
}
