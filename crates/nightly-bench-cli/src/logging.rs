//! Logging flags shared by both binaries.

use clap::Args;
use tracing::Level;

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    pub json: bool,
}

impl LogArgs {
    pub fn level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    pub fn init(&self) {
        nightly_bench_core::init_tracing(self.json, self.level());
    }
}
