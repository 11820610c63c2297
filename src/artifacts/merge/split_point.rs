//! Split point search
//!
//! The split point of two commits is the first commit on the current tip's
//! first-parent chain that also lies on the other tip's first-parent chain. Second
//! parents are never followed, so after criss-cross merges this can be an older
//! ancestor than a full merge-base search would pick. Every chain ends at the shared
//! root commit, so a split point always exists within one repository.

use crate::areas::database::Database;
use crate::artifacts::log::ancestors::Ancestors;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::HashSet;

#[derive(new)]
pub struct SplitPointFinder<'d> {
    database: &'d Database,
}

impl SplitPointFinder<'_> {
    pub fn find(&self, current: &ObjectId, other: &ObjectId) -> anyhow::Result<ObjectId> {
        let other_chain = Ancestors::first_parent(self.database, other.clone())
            .map(|commit| commit.map(|commit| commit.id().clone()))
            .collect::<anyhow::Result<HashSet<_>>>()?;
        debug_log!(
            "split point: {} has {} first-parent ancestors",
            other.to_short_oid(),
            other_chain.len()
        );

        for commit in Ancestors::first_parent(self.database, current.clone()) {
            let commit = commit?;
            debug_log!("split point: visiting {}", commit.id().to_short_oid());

            if other_chain.contains(commit.id()) {
                tracing::debug!(
                    current = %current,
                    other = %other,
                    split = %commit.id(),
                    "found split point"
                );
                return Ok(commit.id().clone());
            }
        }

        anyhow::bail!("no common ancestor between {} and {}", current, other)
    }
}
