use crate::areas::database::Database;
use crate::artifacts::branch::MIN_REVISION_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::RepositoryError;

/// A full or abbreviated commit id as typed by the user
///
/// Abbreviations of at least four hex characters are resolved against the object store;
/// blobs sharing the prefix are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn new(revision: &str) -> Self {
        Self(revision.trim().to_ascii_lowercase())
    }

    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        if !Self::looks_like_oid(&self.0) {
            return Err(RepositoryError::NoSuchCommit(self.0.clone()).into());
        }

        if self.0.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(self.0.clone())?;
            return match database.contains(&oid) && database.is_commit(&oid)? {
                true => Ok(oid),
                false => Err(RepositoryError::NoSuchCommit(self.0.clone()).into()),
            };
        }

        let mut commit_matches = Vec::new();
        for oid in database.find_objects_by_prefix(&self.0)? {
            if database.is_commit(&oid)? {
                commit_matches.push(oid);
            }
        }

        match commit_matches.len() {
            0 => Err(RepositoryError::NoSuchCommit(self.0.clone()).into()),
            1 => Ok(commit_matches.remove(0)),
            _ => Err(RepositoryError::AmbiguousCommit {
                prefix: self.0.clone(),
                candidates: commit_matches
                    .iter()
                    .map(ObjectId::to_short_oid)
                    .collect(),
            }
            .into()),
        }
    }

    fn looks_like_oid(s: &str) -> bool {
        s.len() >= MIN_REVISION_LENGTH
            && s.len() <= OBJECT_ID_LENGTH
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
