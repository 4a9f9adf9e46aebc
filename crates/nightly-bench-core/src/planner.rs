//! One planner cycle: recover history, list heads, plan, persist.

use crate::branches::{BranchLister, BranchRecord, GitLsRemote};
use crate::config::PlannerConfig;
use crate::plan::{plan_pairs, VersionPair};
use crate::store::PlanStore;
use crate::Result;
use tracing::{error, info};

/// Revision-pair planner over a branch source and a plan store.
pub struct Planner<L: BranchLister> {
    lister: L,
    store: PlanStore,
}

impl Planner<GitLsRemote> {
    /// Planner that lists heads with `git ls-remote`.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Planner::new(
            GitLsRemote::new(&config.remote_url),
            PlanStore::from_config(config),
        )
    }
}

impl<L: BranchLister> Planner<L> {
    pub fn new(lister: L, store: PlanStore) -> Self {
        Planner { lister, store }
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Run one cycle and return the pairs written to the plan file.
    ///
    /// A failed branch listing degrades to an empty (or partial) plan; the
    /// plan file is rewritten in every case. The legacy marker is removed only
    /// once the new plan is on disk.
    pub async fn run(&self) -> Result<Vec<VersionPair>> {
        let previous = self.store.load_previous()?;
        let branches = self.list_branches_or_empty().await;

        let pairs = plan_pairs(&previous, &branches);
        info!(
            "Planned {} pair(s) from {} branch head(s)",
            pairs.len(),
            branches.len()
        );

        self.store.save(&pairs)?;
        self.store.discard_legacy_main()?;
        Ok(pairs)
    }

    async fn list_branches_or_empty(&self) -> Vec<BranchRecord> {
        match self.lister.list_heads().await {
            Ok(branches) => branches,
            Err(e) => {
                error!("Listing branch heads failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FailingBranchLister, StaticBranchLister};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_failed_listing_still_writes_empty_plan() {
        let dir = tempdir().unwrap();
        let config = PlannerConfig::new(dir.path());
        let planner = Planner::new(FailingBranchLister, PlanStore::from_config(&config));

        let pairs = planner.run().await.unwrap();
        assert!(pairs.is_empty());
        assert_eq!(std::fs::read_to_string(config.plan_path()).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_run_returns_what_it_writes() {
        let dir = tempdir().unwrap();
        let config = PlannerConfig::new(dir.path());
        let lister = StaticBranchLister::new(vec![
            BranchRecord::new("A", "main"),
            BranchRecord::new("B", "v1.2-histrionicus"),
        ]);
        let planner = Planner::new(lister, PlanStore::from_config(&config));

        let pairs = planner.run().await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(planner.store().read_plan().unwrap(), Some(pairs));
    }
}
