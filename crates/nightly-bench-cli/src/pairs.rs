//! `create-pairs-matrix`: plan this cycle's benchmark pairs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nightly_bench_core::{Planner, PlannerConfig, VersionPair};

use crate::logging::LogArgs;

#[derive(Parser, Debug)]
#[command(name = "create-pairs-matrix")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plan which revision pairs the nightly regression run compares", long_about = None)]
pub struct PairsCli {
    #[command(flatten)]
    pub log: LogArgs,

    /// Directory holding the plan file (default: parent of the working directory)
    #[arg(long, env = "NIGHTLY_BENCH_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Repository whose branch heads are listed
    #[arg(long, env = "NIGHTLY_BENCH_REMOTE")]
    pub remote: Option<String>,
}

impl PairsCli {
    pub fn config(&self) -> Result<PlannerConfig> {
        let mut config = PlannerConfig::from_env().context("Failed to resolve state directory")?;
        if let Some(dir) = &self.state_dir {
            config = config.with_state_dir(dir);
        }
        if let Some(remote) = &self.remote {
            config = config.with_remote(remote);
        }
        Ok(config)
    }
}

/// Run one planning cycle and print the resulting pairs.
pub async fn run(cli: &PairsCli) -> Result<Vec<VersionPair>> {
    let config = cli.config()?;
    let planner = Planner::from_config(&config);

    let pairs = planner
        .run()
        .await
        .with_context(|| format!("Failed to plan pairs in {:?}", config.state_dir))?;

    if pairs.is_empty() {
        println!("No pairs to benchmark this cycle");
    }
    for pair in &pairs {
        println!("{}", describe(pair));
    }
    println!("Plan written to {}", config.plan_path().display());

    Ok(pairs)
}

fn describe(pair: &VersionPair) -> String {
    format!(
        "{}@{} vs {}@{}",
        pair.new_name, pair.new_sha, pair.old_name, pair.old_sha
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_required() {
        let cli = PairsCli::try_parse_from(["create-pairs-matrix"]).unwrap();
        assert!(!cli.log.verbose);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = PairsCli::try_parse_from([
            "create-pairs-matrix",
            "--state-dir",
            "/srv/state",
            "--remote",
            "/srv/mirror.git",
            "-v",
        ])
        .unwrap();

        let config = cli.config().unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/srv/state"));
        assert_eq!(config.remote_url, "/srv/mirror.git");
        assert!(cli.log.verbose);
    }

    #[test]
    fn test_describe_pair() {
        let pair = VersionPair {
            new_name: "main".to_string(),
            new_sha: "Y".to_string(),
            old_name: "v1.2-histrionicus".to_string(),
            old_sha: "B".to_string(),
        };
        assert_eq!(describe(&pair), "main@Y vs v1.2-histrionicus@B");
    }
}
