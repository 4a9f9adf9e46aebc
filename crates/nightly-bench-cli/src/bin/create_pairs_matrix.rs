//! Plan the revision pairs for the next nightly regression run.
//!
//! Reads the previous plan from the parent of the working directory, lists
//! the tracked repository's branch heads and rewrites the plan file.

use anyhow::Result;
use clap::Parser;
use nightly_bench_cli::pairs::{self, PairsCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = PairsCli::parse();
    cli.log.init();

    pairs::run(&cli).await?;
    Ok(())
}
