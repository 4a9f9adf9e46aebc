//! Workflow-dispatch client.
//!
//! A dispatch is a single POST that asks the CI service to start a workflow
//! on a ref with a set of inputs. GitHub answers `204 No Content` when
//! the run was queued.

use crate::config::DispatchConfig;
use crate::error::BenchError;
use crate::results::ResultEntry;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Status GitHub returns for an accepted dispatch.
pub const DISPATCH_ACCEPTED: u16 = 204;

/// Inputs forwarded to the dispatched workflow.
///
/// Values are passed through from the result entry; absent ones are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchInputs {
    pub nightly_build: Option<Value>,
    pub platform: Option<Value>,
    /// Comma-joined when the entry lists several architectures
    pub architectures: Option<Value>,
    pub runs_on: Option<Value>,
    pub run_id: Option<Value>,
}

/// Body of a workflow-dispatch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub inputs: DispatchInputs,
}

impl DispatchRequest {
    /// Request that re-runs `entry`'s platform build on `git_ref`.
    pub fn for_entry(entry: &ResultEntry, git_ref: &str) -> Self {
        DispatchRequest {
            git_ref: git_ref.to_string(),
            inputs: DispatchInputs {
                nightly_build: entry.nightly_build.clone(),
                platform: entry.platform.clone(),
                architectures: entry.architectures.as_ref().map(|a| a.joined()),
                runs_on: entry.runs_on.clone(),
                run_id: entry.run_id.clone(),
            },
        }
    }
}

/// Status and body of a dispatch response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: u16,
    pub body: String,
}

impl DispatchResponse {
    pub fn accepted() -> Self {
        DispatchResponse {
            status: DISPATCH_ACCEPTED,
            body: String::new(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == DISPATCH_ACCEPTED
    }
}

/// Something that can start a workflow run.
///
/// Transport failures are errors; any HTTP response, including 4xx/5xx, is
/// returned as a [`DispatchResponse`].
#[async_trait]
pub trait WorkflowDispatcher: Send + Sync {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchResponse>;
}

/// Dispatcher for the GitHub Actions REST API.
pub struct GithubDispatcher {
    config: DispatchConfig,
    http_client: reqwest::Client,
}

impl GithubDispatcher {
    pub fn new(config: DispatchConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("nightly-bench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BenchError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(GithubDispatcher {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}

#[async_trait]
impl WorkflowDispatcher for GithubDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchResponse> {
        let url = self.config.endpoint();
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read dispatch response body (status {}): {}", status, e);
                String::new()
            }
        };
        Ok(DispatchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Architectures;
    use serde_json::Number;
    use serde_json::json;

    fn entry() -> ResultEntry {
        ResultEntry {
            failures_count: Number::from(0u64),
            nightly_build: Some(json!(20241018)),
            platform: Some(json!("linux")),
            architectures: Some(Architectures::Many(vec![
                "x64".to_string(),
                "arm64".to_string(),
            ])),
            runs_on: Some(json!("ubuntu-latest")),
            run_id: Some(json!(1234)),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = DispatchRequest::for_entry(&entry(), "move-to-python");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "ref": "move-to-python",
                "inputs": {
                    "nightly_build": 20241018,
                    "platform": "linux",
                    "architectures": "x64,arm64",
                    "runs_on": "ubuntu-latest",
                    "run_id": 1234
                }
            })
        );
    }

    #[test]
    fn test_missing_fields_become_null() {
        let sparse = ResultEntry {
            failures_count: Number::from(0u64),
            nightly_build: None,
            platform: Some(json!("windows")),
            architectures: None,
            runs_on: None,
            run_id: None,
        };
        let value = serde_json::to_value(DispatchRequest::for_entry(&sparse, "main")).unwrap();
        assert_eq!(value["inputs"]["platform"], "windows");
        assert!(value["inputs"]["architectures"].is_null());
        assert!(value["inputs"]["run_id"].is_null());
    }

    #[test]
    fn test_only_204_is_accepted() {
        assert!(DispatchResponse::accepted().is_accepted());
        let ok_but_wrong = DispatchResponse {
            status: 200,
            body: String::new(),
        };
        assert!(!ok_but_wrong.is_accepted());
    }

    #[test]
    fn test_github_dispatcher_rejects_missing_token() {
        let config = DispatchConfig::new("o", "r", "w.yml", "main");
        assert!(matches!(
            GithubDispatcher::new(config),
            Err(BenchError::Config(_))
        ));
    }
}
