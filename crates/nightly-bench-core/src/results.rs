//! Per-platform test results consumed by the workflow trigger.
//!
//! Apart from `failures_count`, entry fields are opaque to us: they are
//! forwarded to the dispatched workflow exactly as the test job wrote them.

use crate::error::BenchError;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::path::Path;

/// Architectures tested on a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Architectures {
    /// List of architecture names, sent comma-joined
    Many(Vec<String>),
    /// Anything else, sent unchanged
    Single(Value),
}

impl Architectures {
    /// Value sent as the workflow input.
    pub fn joined(&self) -> Value {
        match self {
            Architectures::Many(archs) => Value::String(archs.join(",")),
            Architectures::Single(value) => value.clone(),
        }
    }
}

/// One platform's outcome from the nightly test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub failures_count: Number,
    #[serde(default)]
    pub nightly_build: Option<Value>,
    #[serde(default)]
    pub platform: Option<Value>,
    #[serde(default)]
    pub architectures: Option<Architectures>,
    #[serde(default)]
    pub runs_on: Option<Value>,
    #[serde(default)]
    pub run_id: Option<Value>,
}

impl ResultEntry {
    /// Zero failures, whether written as `0`, `-0` or `0.0`.
    pub fn passed(&self) -> bool {
        self.failures_count.as_f64() == Some(0.0)
    }

    /// Short label for log lines.
    pub fn label(&self) -> String {
        format!(
            "{}/{}",
            display_or_unknown(self.platform.as_ref()),
            display_or_unknown(self.architectures.as_ref().map(Architectures::joined).as_ref())
        )
    }
}

fn display_or_unknown(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "?".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Parse a results file.
pub fn load_results(path: &Path) -> Result<Vec<ResultEntry>> {
    let content = std::fs::read_to_string(path)?;
    parse_results(&content).map_err(|e| BenchError::MalformedResults {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_results(content: &str) -> serde_json::Result<Vec<ResultEntry>> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_entry() {
        let entries = parse_results(
            r#"[{
                "failures_count": 0,
                "nightly_build": "duckdb-nightly",
                "platform": "linux",
                "architectures": ["x64", "arm64"],
                "runs_on": "ubuntu-latest",
                "run_id": 9876543210
            }]"#,
        )
        .unwrap();

        let entry = &entries[0];
        assert!(entry.passed());
        assert_eq!(entry.platform, Some(json!("linux")));
        assert_eq!(entry.architectures.as_ref().unwrap().joined(), json!("x64,arm64"));
        assert_eq!(entry.run_id, Some(json!(9876543210u64)));
        assert_eq!(entry.label(), "linux/x64,arm64");
    }

    #[test]
    fn test_single_architecture_and_string_run_id() {
        let entries = parse_results(
            r#"[{"failures_count": 3, "architectures": "osx_arm64", "run_id": "42"}]"#,
        )
        .unwrap();

        let entry = &entries[0];
        assert!(!entry.passed());
        assert_eq!(
            entry.architectures,
            Some(Architectures::Single(json!("osx_arm64")))
        );
        assert_eq!(entry.run_id, Some(json!("42")));
        assert_eq!(entry.platform, None);
        assert_eq!(entry.label(), "?/osx_arm64");
    }

    #[test]
    fn test_non_string_fields_are_accepted() {
        let entries = parse_results(
            r#"[
                {"failures_count": 0.0, "nightly_build": 20241018, "platform": "linux",
                 "architectures": "x64", "runs_on": ["self-hosted", "linux"], "run_id": -5},
                {"failures_count": 1.5, "nightly_build": true, "platform": 7}
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].passed());
        assert_eq!(entries[0].nightly_build, Some(json!(20241018)));
        assert_eq!(entries[0].runs_on, Some(json!(["self-hosted", "linux"])));
        assert_eq!(entries[0].run_id, Some(json!(-5)));

        assert!(!entries[1].passed());
        assert_eq!(entries[1].label(), "7/?");
    }

    #[test]
    fn test_missing_failures_count_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, r#"[{"platform": "linux"}]"#).unwrap();

        let err = load_results(&path).unwrap_err();
        assert!(matches!(err, BenchError::MalformedResults { .. }));
    }

    #[test]
    fn test_non_numeric_failures_count_is_malformed() {
        assert!(parse_results(r#"[{"failures_count": "0"}]"#).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_results(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, BenchError::Io(_)));
    }
}
