//! `trigger-tests`: dispatch follow-up workflows for passing platforms.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nightly_bench_core::{
    load_results, trigger_workflows, DispatchConfig, DispatchOutcome, GithubDispatcher,
    TriggerReport, WorkflowDispatcher,
};

use crate::logging::LogArgs;

#[derive(Parser, Debug)]
#[command(name = "trigger-tests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dispatch a workflow run for every platform with zero test failures", long_about = None)]
pub struct TriggerCli {
    #[command(flatten)]
    pub log: LogArgs,

    /// Token used as the bearer credential for the CI API
    #[arg(value_name = "GH_TOKEN")]
    pub token: String,

    /// JSON file with the per-platform results
    #[arg(long)]
    pub inputs: PathBuf,

    /// API root (default: https://api.github.com)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Owner of the repository holding the workflow
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository holding the workflow
    #[arg(long)]
    pub repo: Option<String>,

    /// Workflow file name or id
    #[arg(long)]
    pub workflow: Option<String>,

    /// Ref the dispatched workflow runs on
    #[arg(long = "ref")]
    pub git_ref: Option<String>,
}

impl TriggerCli {
    pub fn config(&self) -> DispatchConfig {
        let mut config = DispatchConfig::from_env().with_token(&self.token);
        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(owner) = &self.owner {
            config.owner = owner.clone();
        }
        if let Some(repo) = &self.repo {
            config.repo = repo.clone();
        }
        if let Some(workflow) = &self.workflow {
            config.workflow = workflow.clone();
        }
        if let Some(git_ref) = &self.git_ref {
            config.git_ref = git_ref.clone();
        }
        config
    }
}

pub async fn run(cli: &TriggerCli) -> Result<TriggerReport> {
    let config = cli.config();
    let dispatcher =
        GithubDispatcher::new(config.clone()).context("Invalid dispatch configuration")?;
    run_with(&dispatcher, &config.git_ref, cli).await
}

/// Process the results file against any dispatcher and print the report.
pub async fn run_with(
    dispatcher: &dyn WorkflowDispatcher,
    git_ref: &str,
    cli: &TriggerCli,
) -> Result<TriggerReport> {
    let entries = load_results(&cli.inputs)
        .with_context(|| format!("Failed to read results from {:?}", cli.inputs))?;

    let report = trigger_workflows(dispatcher, git_ref, &entries)
        .await
        .context("Workflow dispatch failed")?;

    for (entry, outcome) in entries.iter().zip(&report.outcomes) {
        println!("{}: {} failure(s)", entry.label(), entry.failures_count);
        if !matches!(outcome, DispatchOutcome::Skipped { .. }) {
            println!("{outcome}");
        }
    }

    println!(
        "Triggered {}, rejected {}, skipped {}",
        report.triggered(),
        report.rejected(),
        report.skipped()
    );
    Ok(report)
}
