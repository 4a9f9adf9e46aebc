//! Logging setup for the nightly-bench binaries.
//!
//! Log lines go to stderr; stdout carries the plan summary and dispatch report
//! that CI steps capture. Call [`init_tracing`] once at program start; later
//! calls are no-ops.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directives for this tool, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "NIGHTLY_BENCH_LOG";

/// Crates whose events follow the `--verbose` level by default.
const OWN_CRATES: [&str; 2] = ["nightly_bench_core", "nightly_bench_cli"];

/// Install the global subscriber.
///
/// `json` switches to newline-delimited JSON for CI log collectors. `level`
/// applies to our own crates when neither `NIGHTLY_BENCH_LOG` nor `RUST_LOG`
/// is set; dependencies (reqwest, hyper) stay at `warn`.
pub fn init_tracing(json: bool, level: Level) {
    let explicit = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();
    let env_filter = EnvFilter::try_new(filter_directives(explicit, level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(None, level)));

    // Exactly one of the two layers is present.
    tracing_subscriber::registry()
        .with(env_filter)
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .with(json.then(|| {
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
        }))
        .try_init()
        .ok();
}

/// Directives to use: an explicit, non-blank setting wins, otherwise `warn`
/// globally and `level` for our crates.
pub fn filter_directives(explicit: Option<String>, level: Level) -> String {
    if let Some(directives) = explicit.filter(|d| !d.trim().is_empty()) {
        return directives;
    }

    let level = level.as_str().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_scope_level_to_own_crates() {
        assert_eq!(
            filter_directives(None, Level::DEBUG),
            "warn,nightly_bench_core=debug,nightly_bench_cli=debug"
        );
    }

    #[test]
    fn explicit_directives_win_unless_blank() {
        assert_eq!(
            filter_directives(Some("reqwest=trace".to_string()), Level::INFO),
            "reqwest=trace"
        );
        assert_eq!(
            filter_directives(Some("  ".to_string()), Level::INFO),
            "warn,nightly_bench_core=info,nightly_bench_cli=info"
        );
    }

    #[test]
    fn default_directives_parse() {
        assert!(EnvFilter::try_new(filter_directives(None, Level::TRACE)).is_ok());
    }

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
        tracing::info!("still logging after repeated init");
    }
}
