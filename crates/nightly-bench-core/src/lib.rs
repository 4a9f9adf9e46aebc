//! nightly-bench core: regression benchmark orchestration for nightly CI
//!
//! Two jobs run around the nightly benchmark suite:
//!
//! - the **planner** decides which revision pairs to benchmark this cycle
//!   (`main` against last cycle's `main`, `main` against the newest release
//!   branch, and that release branch against its previous head) and writes
//!   them to a plan file for the benchmark runner;
//! - the **trigger** reads the per-platform test results and dispatches a
//!   follow-up workflow for every platform that had no failures.
//!
//! Network access sits behind [`BranchLister`] and [`WorkflowDispatcher`];
//! [`fakes`] has in-memory implementations for tests.

pub mod branches;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fakes;
pub mod plan;
pub mod planner;
pub mod results;
pub mod store;
pub mod telemetry;
pub mod trigger;

pub use branches::{
    find_highest_version, find_main, parse_branch_listing, version_token, BranchLister,
    BranchRecord, GitLsRemote, MAIN_BRANCH,
};
pub use config::{DispatchConfig, PlannerConfig};
pub use dispatch::{
    DispatchInputs, DispatchRequest, DispatchResponse, GithubDispatcher, WorkflowDispatcher,
};
pub use error::{BenchError, Result};
pub use plan::{plan_pairs, PreviousRevisions, VersionPair};
pub use planner::Planner;
pub use results::{load_results, Architectures, ResultEntry};
pub use store::PlanStore;
pub use telemetry::init_tracing;
pub use trigger::{dispatch_entry, trigger_workflows, DispatchOutcome, TriggerReport};
