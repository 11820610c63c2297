use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Create a branch pointing at the head commit; the current branch does not change
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let source_oid = self.head_commit_id()?;

        self.refs_mut().create_branch(branch_name, source_oid)
    }

    /// Delete a branch pointer; its commits stay in the object store
    pub fn remove_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.refs_mut().delete_branch(branch_name)?;

        Ok(())
    }
}
