//! In-memory fakes for the network seams (testing only)
//!
//! Provides `StaticBranchLister`, `FailingBranchLister`, `RecordingDispatcher`
//! and `UnreachableDispatcher` so planner and trigger logic can be exercised
//! without `git` or an HTTP server.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::branches::{BranchLister, BranchRecord};
use crate::dispatch::{DispatchRequest, DispatchResponse, WorkflowDispatcher};
use crate::error::BenchError;
use crate::Result;

// ---------------------------------------------------------------------------
// Branch listers
// ---------------------------------------------------------------------------

/// Returns a fixed set of branch heads.
#[derive(Debug, Clone, Default)]
pub struct StaticBranchLister {
    branches: Vec<BranchRecord>,
}

impl StaticBranchLister {
    pub fn new(branches: Vec<BranchRecord>) -> Self {
        StaticBranchLister { branches }
    }
}

#[async_trait]
impl BranchLister for StaticBranchLister {
    async fn list_heads(&self) -> Result<Vec<BranchRecord>> {
        Ok(self.branches.clone())
    }
}

/// Always fails, like an unreachable remote.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingBranchLister;

#[async_trait]
impl BranchLister for FailingBranchLister {
    async fn list_heads(&self) -> Result<Vec<BranchRecord>> {
        Err(BenchError::GitCommand(
            "fatal: unable to access remote".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Dispatchers
// ---------------------------------------------------------------------------

/// Records every request and answers from a script.
///
/// Once the scripted responses run out every dispatch is accepted.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    requests: Mutex<Vec<DispatchRequest>>,
    responses: Mutex<VecDeque<DispatchResponse>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<DispatchResponse>) -> Self {
        RecordingDispatcher {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowDispatcher for RecordingDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.responses.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(DispatchResponse::accepted))
    }
}

/// Fails every dispatch at the transport level.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableDispatcher;

#[async_trait]
impl WorkflowDispatcher for UnreachableDispatcher {
    async fn dispatch(&self, _request: &DispatchRequest) -> Result<DispatchResponse> {
        Err(BenchError::Http("connection refused".to_string()))
    }
}
