//! Branch table
//!
//! Maps branch names to the commit each one points at, plus `head`, the name of the
//! checked-out branch. `head` is always a key of the table; every operation that could
//! break that refuses to run instead.
//!
//! The table lives inside the repository state record (see `areas::repository`) and
//! never touches the object store itself.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refs {
    /// Currently checked-out branch
    head: BranchName,
    /// Branch tips, in name order
    branches: BTreeMap<BranchName, ObjectId>,
}

impl Refs {
    /// A table holding only the default branch, pointed at `root`
    pub fn new(root: ObjectId) -> Self {
        let head = BranchName::default_branch();
        let branches = BTreeMap::from([(head.clone(), root)]);

        Refs { head, branches }
    }

    /// Check the `head` invariant after loading from disk
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.branches.contains_key(&self.head) {
            anyhow::bail!(
                "corrupt repository state: head names missing branch {}",
                self.head
            );
        }

        Ok(())
    }

    pub fn head(&self) -> &BranchName {
        &self.head
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> bool {
        &self.head == branch_name
    }

    /// Commit the current branch points at
    pub fn read_head(&self) -> anyhow::Result<&ObjectId> {
        self.branches.get(&self.head).ok_or_else(|| {
            anyhow::anyhow!(
                "corrupt repository state: head names missing branch {}",
                self.head
            )
        })
    }

    pub fn read_ref(&self, branch_name: &BranchName) -> Option<&ObjectId> {
        self.branches.get(branch_name)
    }

    /// Like [`Refs::read_ref`], failing with [`RepositoryError::NoSuchBranch`]
    pub fn resolve_branch(&self, name: &str) -> anyhow::Result<(BranchName, ObjectId)> {
        let missing = || RepositoryError::NoSuchBranch(name.to_string());

        let branch_name = BranchName::try_parse(name.to_string()).map_err(|_| missing())?;
        let oid = self.read_ref(&branch_name).cloned().ok_or_else(missing)?;

        Ok((branch_name, oid))
    }

    pub fn create_branch(&mut self, name: BranchName, source_oid: ObjectId) -> anyhow::Result<()> {
        if self.branches.contains_key(&name) {
            return Err(RepositoryError::BranchExists(name.to_string()).into());
        }

        tracing::info!(branch = %name, oid = %source_oid, "created branch");
        self.branches.insert(name, source_oid);

        Ok(())
    }

    pub fn delete_branch(&mut self, name: &str) -> anyhow::Result<ObjectId> {
        if self.head.as_ref() == name {
            return Err(RepositoryError::CannotRemoveCurrentBranch.into());
        }

        let (branch_name, _) = self.resolve_branch(name)?;
        let oid = self
            .branches
            .remove(&branch_name)
            .ok_or_else(|| RepositoryError::NoSuchBranch(name.to_string()))?;
        tracing::info!(branch = %branch_name, oid = %oid, "deleted branch");

        Ok(oid)
    }

    /// Move the current branch to `oid`
    pub fn update_head(&mut self, oid: ObjectId) {
        tracing::debug!(branch = %self.head, oid = %oid, "moved branch");
        self.branches.insert(self.head.clone(), oid);
    }

    /// Make an existing branch the current one
    pub fn set_head(&mut self, branch_name: BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(&branch_name) {
            return Err(RepositoryError::NoSuchBranch(branch_name.to_string()).into());
        }

        tracing::debug!(from = %self.head, to = %branch_name, "switched head");
        self.head = branch_name;

        Ok(())
    }

    pub fn list_branches(&self) -> impl Iterator<Item = (&BranchName, &ObjectId)> {
        self.branches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(seed: &str) -> ObjectId {
        ObjectId::hash(seed.as_bytes())
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[test]
    fn starts_on_default_branch() {
        let refs = Refs::new(oid("root"));

        assert_eq!(refs.head(), &BranchName::default_branch());
        assert_eq!(refs.read_head().unwrap(), &oid("root"));
        assert!(refs.validate().is_ok());
    }

    #[test]
    fn duplicate_branch_is_refused() {
        let mut refs = Refs::new(oid("root"));
        refs.create_branch(branch("feature"), oid("root")).unwrap();

        let err = refs
            .create_branch(branch("feature"), oid("other"))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::BranchExists("feature".to_string()))
        );
        assert_eq!(refs.read_ref(&branch("feature")), Some(&oid("root")));
    }

    #[test]
    fn current_branch_cannot_be_deleted() {
        let mut refs = Refs::new(oid("root"));

        let err = refs.delete_branch("master").unwrap_err();
        assert_eq!(
            err.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::CannotRemoveCurrentBranch)
        );
    }

    #[test]
    fn deleting_missing_branch_is_no_such_branch() {
        let mut refs = Refs::new(oid("root"));

        for name in ["ghost", "bad name"] {
            let err = refs.delete_branch(name).unwrap_err();
            assert_eq!(
                err.downcast_ref::<RepositoryError>(),
                Some(&RepositoryError::NoSuchBranch(name.to_string()))
            );
        }
    }

    #[test]
    fn update_head_moves_only_current_branch() {
        let mut refs = Refs::new(oid("root"));
        refs.create_branch(branch("feature"), oid("root")).unwrap();

        refs.update_head(oid("next"));

        assert_eq!(refs.read_head().unwrap(), &oid("next"));
        assert_eq!(refs.read_ref(&branch("feature")), Some(&oid("root")));
    }

    #[test]
    fn validate_catches_dangling_head() {
        let json = format!(
            r#"{{"head":"gone","branches":{{"master":"{}"}}}}"#,
            oid("root")
        );
        let refs: Refs = serde_json::from_str(&json).unwrap();

        assert!(refs.validate().is_err());
    }
}
