//! Fan out workflow dispatches for platforms whose tests passed.

use crate::dispatch::{DispatchRequest, WorkflowDispatcher};
use crate::results::ResultEntry;
use crate::Result;
use serde_json::Number;
use std::fmt;
use tracing::{info, warn};

/// What happened to one result entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Entry had failures; nothing was sent
    Skipped { failures_count: Number },
    /// The API accepted the dispatch
    Triggered,
    /// The API answered with something other than 204
    Rejected { status: u16, body: String },
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Skipped { failures_count } => {
                write!(f, "Skipped: {failures_count} failure(s)")
            }
            DispatchOutcome::Triggered => f.write_str("Workflow triggered successfully!"),
            DispatchOutcome::Rejected { status, body } => {
                write!(f, "Failed to trigger workflow: {status}\n{body}")
            }
        }
    }
}

/// Per-entry outcomes in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerReport {
    pub outcomes: Vec<DispatchOutcome>,
}

impl TriggerReport {
    pub fn push(&mut self, outcome: DispatchOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn triggered(&self) -> usize {
        self.count(|o| matches!(o, DispatchOutcome::Triggered))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, DispatchOutcome::Rejected { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DispatchOutcome::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&DispatchOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Dispatch one entry if it has no failures.
pub async fn dispatch_entry(
    dispatcher: &dyn WorkflowDispatcher,
    git_ref: &str,
    entry: &ResultEntry,
) -> Result<DispatchOutcome> {
    if !entry.passed() {
        info!(
            "{}: {} failure(s), not triggering",
            entry.label(),
            entry.failures_count
        );
        return Ok(DispatchOutcome::Skipped {
            failures_count: entry.failures_count.clone(),
        });
    }

    let request = DispatchRequest::for_entry(entry, git_ref);
    let response = dispatcher.dispatch(&request).await?;

    if response.is_accepted() {
        info!("{}: workflow dispatched on {}", entry.label(), git_ref);
        Ok(DispatchOutcome::Triggered)
    } else {
        warn!(
            "{}: dispatch rejected with status {}: {}",
            entry.label(),
            response.status,
            response.body
        );
        Ok(DispatchOutcome::Rejected {
            status: response.status,
            body: response.body,
        })
    }
}

/// Process every entry in order.
///
/// Rejections are recorded and processing continues; a transport error stops
/// the loop and is returned.
pub async fn trigger_workflows(
    dispatcher: &dyn WorkflowDispatcher,
    git_ref: &str,
    entries: &[ResultEntry],
) -> Result<TriggerReport> {
    let mut report = TriggerReport::default();
    for entry in entries {
        report.push(dispatch_entry(dispatcher, git_ref, entry).await?);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchResponse;
    use crate::fakes::RecordingDispatcher;
    use crate::results::Architectures;
    use serde_json::json;

    fn entry(failures_count: u64, platform: &str) -> ResultEntry {
        ResultEntry {
            failures_count: Number::from(failures_count),
            nightly_build: Some(json!("nightly")),
            platform: Some(json!(platform)),
            architectures: Some(Architectures::Single(json!("x64"))),
            runs_on: Some(json!("ubuntu-latest")),
            run_id: None,
        }
    }

    #[tokio::test]
    async fn test_failed_entry_is_not_dispatched() {
        let dispatcher = RecordingDispatcher::new();
        let outcome = dispatch_entry(&dispatcher, "main", &entry(5, "linux"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped {
                failures_count: Number::from(5u64)
            }
        );
        assert!(dispatcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_does_not_stop_later_entries() {
        let dispatcher = RecordingDispatcher::with_responses(vec![
            DispatchResponse {
                status: 500,
                body: "{\"message\":\"boom\"}".to_string(),
            },
            DispatchResponse::accepted(),
        ]);
        let entries = vec![entry(0, "linux"), entry(1, "osx"), entry(0, "windows")];

        let report = trigger_workflows(&dispatcher, "main", &entries)
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(
            report.outcomes[0],
            DispatchOutcome::Rejected {
                status: 500,
                body: "{\"message\":\"boom\"}".to_string()
            }
        );
        assert_eq!(report.triggered(), 1);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.skipped(), 1);

        let platforms: Vec<_> = dispatcher
            .requests()
            .into_iter()
            .map(|r| r.inputs.platform.unwrap())
            .collect();
        assert_eq!(platforms, vec![json!("linux"), json!("windows")]);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            DispatchOutcome::Triggered.to_string(),
            "Workflow triggered successfully!"
        );
        let rejected = DispatchOutcome::Rejected {
            status: 422,
            body: "bad ref".to_string(),
        };
        assert_eq!(
            rejected.to_string(),
            "Failed to trigger workflow: 422\nbad ref"
        );
    }
}
