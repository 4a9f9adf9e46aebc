//! Configuration for the planner and the workflow trigger.
//!
//! Both configs start from environment variables with built-in fallbacks and
//! can be adjusted with `with_*` setters before use.

use crate::error::BenchError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Repository whose branch heads are benchmarked.
pub const DEFAULT_REMOTE_URL: &str = "https://github.com/duckdb/duckdb.git";
/// Plan file consumed by the benchmark runner.
pub const PLAN_FILE_NAME: &str = "duckdb_previous_version_pairs.json";
/// Single-value file left behind by older planner versions.
pub const LEGACY_MAIN_FILE_NAME: &str = "duckdb_curr_version_main.txt";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_REPO_OWNER: &str = "zuleykhapa";
pub const DEFAULT_REPO_NAME: &str = "nbc";
pub const DEFAULT_WORKFLOW: &str = "Test.yml";
pub const DEFAULT_REF: &str = "move-to-python";

/// Where the planner keeps its state and which remote it lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Directory holding the plan file and the legacy marker
    pub state_dir: PathBuf,
    /// Remote passed to `git ls-remote --heads`
    pub remote_url: String,
    pub plan_file_name: String,
    pub legacy_file_name: String,
}

impl PlannerConfig {
    /// Config rooted at `state_dir` with the default remote and file names.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        PlannerConfig {
            state_dir: state_dir.into(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            plan_file_name: PLAN_FILE_NAME.to_string(),
            legacy_file_name: LEGACY_MAIN_FILE_NAME.to_string(),
        }
    }

    /// Build from `NIGHTLY_BENCH_STATE_DIR` / `NIGHTLY_BENCH_REMOTE`.
    ///
    /// Without an explicit state directory the parent of the current working
    /// directory is used, which is where CI runners keep files between jobs.
    pub fn from_env() -> Result<Self> {
        let state_dir = match std::env::var("NIGHTLY_BENCH_STATE_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => parent_of_cwd()?,
        };

        let mut config = Self::new(state_dir);
        if let Ok(remote) = std::env::var("NIGHTLY_BENCH_REMOTE") {
            if !remote.is_empty() {
                config.remote_url = remote;
            }
        }
        Ok(config)
    }

    pub fn with_remote(mut self, remote_url: &str) -> Self {
        self.remote_url = remote_url.to_string();
        self
    }

    pub fn with_state_dir(mut self, state_dir: &Path) -> Self {
        self.state_dir = state_dir.to_path_buf();
        self
    }

    pub fn plan_path(&self) -> PathBuf {
        self.state_dir.join(&self.plan_file_name)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.state_dir.join(&self.legacy_file_name)
    }
}

fn parent_of_cwd() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    // At the filesystem root there is no parent; stay where we are.
    Ok(cwd.parent().map(Path::to_path_buf).unwrap_or(cwd))
}

/// Target of the workflow-dispatch calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// API root, e.g. `https://api.github.com`
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    /// Workflow file name or numeric workflow id
    pub workflow: String,
    /// Git ref the dispatched workflow runs on
    pub git_ref: String,
    /// Bearer token
    #[serde(skip_serializing, default)]
    pub token: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            api_base: env_or("NIGHTLY_BENCH_API_BASE", DEFAULT_API_BASE),
            owner: env_or("NIGHTLY_BENCH_REPO_OWNER", DEFAULT_REPO_OWNER),
            repo: env_or("NIGHTLY_BENCH_REPO_NAME", DEFAULT_REPO_NAME),
            workflow: env_or("NIGHTLY_BENCH_WORKFLOW", DEFAULT_WORKFLOW),
            git_ref: env_or("NIGHTLY_BENCH_REF", DEFAULT_REF),
            token: String::new(),
        }
    }
}

impl DispatchConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific repository and workflow
    pub fn new(owner: &str, repo: &str, workflow: &str, git_ref: &str) -> Self {
        DispatchConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            workflow: workflow.to_string(),
            git_ref: git_ref.to_string(),
            token: String::new(),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    /// Full URL of the workflow-dispatch endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows/{}/dispatches",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.workflow
        )
    }

    /// Reject configs that cannot possibly produce a valid request.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("api base", &self.api_base),
            ("repository owner", &self.owner),
            ("repository name", &self.repo),
            ("workflow", &self.workflow),
            ("ref", &self.git_ref),
            ("token", &self.token),
        ];
        for (what, value) in required {
            if value.trim().is_empty() {
                return Err(BenchError::Config(format!("{what} must not be empty")));
            }
        }
        Ok(())
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => fallback.to_string(),
    }
}
