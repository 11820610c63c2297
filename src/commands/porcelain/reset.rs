use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;

impl Repository {
    /// Point the current branch at an arbitrary commit and replace the working tree
    /// with it
    pub fn reset(&mut self, commit_id: &str) -> anyhow::Result<()> {
        let target_oid = Revision::new(commit_id).resolve(self.database())?;
        let target = self.database().load_commit(&target_oid)?;

        self.materialize(&target)?;
        self.refs_mut().update_head(target_oid);

        Ok(())
    }
}
