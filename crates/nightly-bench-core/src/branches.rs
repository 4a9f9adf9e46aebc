//! Remote branch heads: listing, parsing and selection.
//!
//! The planner only cares about two branches of the tracked repository:
//! `main`, and the release branch with the greatest version token
//! (`v1.2-histrionicus` style names).

use crate::error::BenchError;
use crate::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, warn};

/// Name of the development branch.
pub const MAIN_BRANCH: &str = "main";

/// Sentinel every real version token must beat.
const VERSION_FLOOR: &str = "-1";

/// A branch head as reported by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Revision the branch points at
    pub sha: String,
    /// Leaf ref name, e.g. `main` for `refs/heads/main`
    pub name: String,
}

impl BranchRecord {
    pub fn new(sha: &str, name: &str) -> Self {
        BranchRecord {
            sha: sha.to_string(),
            name: name.to_string(),
        }
    }
}

/// Parse `git ls-remote --heads` output into branch records.
///
/// The name kept is the path component right after `refs/heads/`. Lines that
/// do not look like `<sha> <ref>` are skipped.
pub fn parse_branch_listing(listing: &str) -> Vec<BranchRecord> {
    let mut records = Vec::new();

    for line in listing.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [sha, ref_path] = fields.as_slice() else {
            warn!("Skipping malformed branch listing line: {:?}", line);
            continue;
        };

        match ref_path.split('/').nth(2) {
            Some(name) if !name.is_empty() => records.push(BranchRecord::new(sha, name)),
            _ => warn!("Skipping ref without a branch name: {:?}", ref_path),
        }
    }

    records
}

/// The branch named exactly `main`, if present.
pub fn find_main(branches: &[BranchRecord]) -> Option<&BranchRecord> {
    // Last one wins if the listing somehow repeats it.
    branches.iter().rev().find(|b| b.name == MAIN_BRANCH)
}

/// Version token of a release branch name: `v1.2-histrionicus` -> `1.2`.
///
/// The token is everything between the leading `v` and the last hyphen.
pub fn version_token(name: &str) -> Option<&str> {
    static VERSION_BRANCH: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_BRANCH
        .get_or_init(|| Regex::new(r"^v(.*)-").expect("version branch pattern is valid"));
    re.captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Release branch with the greatest version token.
///
/// Tokens are compared as plain strings, so `1.10` sorts below `1.2`. Ties
/// keep the first branch seen.
pub fn find_highest_version(branches: &[BranchRecord]) -> Option<&BranchRecord> {
    let mut highest_token = VERSION_FLOOR;
    let mut highest = None;

    for branch in branches.iter().filter(|b| b.name != MAIN_BRANCH) {
        let Some(token) = version_token(&branch.name) else {
            continue;
        };
        if token > highest_token {
            debug!("New highest version branch: {} ({})", branch.name, token);
            highest_token = token;
            highest = Some(branch);
        }
    }

    highest
}

/// Source of branch heads for the tracked repository.
#[async_trait]
pub trait BranchLister: Send + Sync {
    async fn list_heads(&self) -> Result<Vec<BranchRecord>>;
}

/// Lists heads by running `git ls-remote --heads <remote>`.
#[derive(Debug, Clone)]
pub struct GitLsRemote {
    remote_url: String,
    git_binary: String,
}

impl GitLsRemote {
    pub fn new(remote_url: &str) -> Self {
        GitLsRemote {
            remote_url: remote_url.to_string(),
            git_binary: "git".to_string(),
        }
    }

    /// Use a specific `git` executable instead of the one on `PATH`.
    pub fn with_git_binary(mut self, git_binary: &str) -> Self {
        self.git_binary = git_binary.to_string();
        self
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }
}

#[async_trait]
impl BranchLister for GitLsRemote {
    async fn list_heads(&self) -> Result<Vec<BranchRecord>> {
        debug!("Listing heads of {}", self.remote_url);

        let output = Command::new(&self.git_binary)
            .args(["ls-remote", "--heads", &self.remote_url])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| BenchError::GitCommand(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BenchError::GitCommand(format!(
                "git ls-remote --heads {} failed: {}",
                self.remote_url,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_branch_listing(&stdout))
    }
}
