//! Revision pairs and the historical pairing rules.
//!
//! Each planner run compares up to three pairs:
//!
//! 1. current `main` against the `main` benchmarked last cycle,
//! 2. current `main` against the current highest release branch,
//! 3. the current release branch against the one benchmarked last cycle.

use crate::branches::{find_highest_version, find_main, BranchRecord, MAIN_BRANCH};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Two revisions to benchmark against each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPair {
    pub new_name: String,
    pub new_sha: String,
    pub old_name: String,
    pub old_sha: String,
}

impl VersionPair {
    /// Pair a newer revision with an older one.
    pub fn new(new: &BranchRecord, old_name: &str, old_sha: &str) -> Self {
        VersionPair {
            new_name: new.name.clone(),
            new_sha: new.sha.clone(),
            old_name: old_name.to_string(),
            old_sha: old_sha.to_string(),
        }
    }

    fn is_main(&self) -> bool {
        self.new_name == MAIN_BRANCH
    }

    fn is_release(&self) -> bool {
        self.new_name.starts_with('v')
    }
}

/// What the previous cycle benchmarked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousRevisions {
    /// Whether a plan file or legacy marker was found at all
    pub found_prior_state: bool,
    pub old_main_sha: Option<String>,
    pub old_highest_version_sha: Option<String>,
}

impl PreviousRevisions {
    /// Nothing recorded: the first run on a fresh runner.
    pub fn first_run() -> Self {
        Self::default()
    }

    /// Recover previous revisions from a prior plan.
    ///
    /// The first pair whose new side is `main` gives the old main revision;
    /// the first pair whose new side is a `v...` release branch gives the old
    /// release revision.
    pub fn from_pairs(pairs: &[VersionPair]) -> Self {
        let old_main_sha = pairs
            .iter()
            .find(|p| p.is_main())
            .map(|p| p.new_sha.clone());
        let old_highest_version_sha = pairs
            .iter()
            .find(|p| p.is_release())
            .map(|p| p.new_sha.clone());

        PreviousRevisions {
            found_prior_state: true,
            old_main_sha,
            old_highest_version_sha,
        }
    }

    /// Fill in the old main revision from the legacy marker file.
    ///
    /// A value already recovered from the plan file is kept.
    pub fn with_legacy_main(mut self, legacy_main_sha: Option<String>) -> Self {
        if let Some(sha) = legacy_main_sha {
            self.found_prior_state = true;
            if self.old_main_sha.is_none() {
                self.old_main_sha = Some(sha);
            }
        }
        self
    }
}

/// Compute this cycle's pairs from last cycle's state and the current heads.
pub fn plan_pairs(previous: &PreviousRevisions, branches: &[BranchRecord]) -> Vec<VersionPair> {
    let main = find_main(branches);
    let highest = find_highest_version(branches);
    debug!(
        "main = {:?}, highest version = {:?}",
        main.map(|b| &b.sha),
        highest.map(|b| &b.name)
    );

    let mut pairs = Vec::with_capacity(3);

    if let (true, Some(main), Some(old_main_sha)) = (
        previous.found_prior_state,
        main,
        previous.old_main_sha.as_deref(),
    ) {
        pairs.push(VersionPair::new(main, &main.name, old_main_sha));
    }

    if let (Some(main), Some(highest)) = (main, highest) {
        pairs.push(VersionPair::new(main, &highest.name, &highest.sha));

        if let Some(old_highest_sha) = previous.old_highest_version_sha.as_deref() {
            pairs.push(VersionPair::new(highest, &highest.name, old_highest_sha));
        }
    }

    pairs
}
