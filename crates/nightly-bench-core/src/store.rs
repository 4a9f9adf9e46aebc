//! Plan file persistence.
//!
//! The plan file is a JSON array of [`VersionPair`]s that the benchmark
//! runner consumes. It doubles as the planner's memory: the next run reads it
//! back to learn which revisions were benchmarked last time.

use crate::config::PlannerConfig;
use crate::error::BenchError;
use crate::plan::{PreviousRevisions, VersionPair};
use crate::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[cfg(unix)]
const PLAN_FILE_MODE: u32 = 0o644;

/// Reads and writes the planner's files in one state directory.
#[derive(Debug, Clone)]
pub struct PlanStore {
    plan_path: PathBuf,
    legacy_path: PathBuf,
}

impl PlanStore {
    pub fn new(plan_path: impl Into<PathBuf>, legacy_path: impl Into<PathBuf>) -> Self {
        PlanStore {
            plan_path: plan_path.into(),
            legacy_path: legacy_path.into(),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.plan_path(), config.legacy_path())
    }

    pub fn plan_path(&self) -> &Path {
        &self.plan_path
    }

    pub fn legacy_path(&self) -> &Path {
        &self.legacy_path
    }

    /// Read the legacy main marker without removing it.
    ///
    /// Returns `None` when the file is absent or blank.
    pub fn peek_legacy_main(&self) -> Result<Option<String>> {
        if !self.legacy_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.legacy_path)?;
        let sha = content.trim();
        Ok((!sha.is_empty()).then(|| sha.to_string()))
    }

    /// Delete the legacy main marker if it exists.
    pub fn discard_legacy_main(&self) -> Result<()> {
        if !self.legacy_path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&self.legacy_path)?;
        info!("Consumed legacy marker {:?}", self.legacy_path);
        Ok(())
    }

    /// Read the prior plan, if one exists.
    pub fn read_plan(&self) -> Result<Option<Vec<VersionPair>>> {
        if !self.plan_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.plan_path)?;
        let pairs: Vec<VersionPair> =
            serde_json::from_str(&content).map_err(|e| BenchError::MalformedPlan {
                path: self.plan_path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!("Read {} pair(s) from {:?}", pairs.len(), self.plan_path);
        Ok(Some(pairs))
    }

    /// Recover what the previous cycle benchmarked.
    ///
    /// Leaves the legacy marker in place; see [`PlanStore::discard_legacy_main`].
    pub fn load_previous(&self) -> Result<PreviousRevisions> {
        let legacy_main = self.peek_legacy_main()?;

        let previous = match self.read_plan()? {
            Some(pairs) => PreviousRevisions::from_pairs(&pairs),
            None => {
                info!(
                    "No previous plan at {:?}; a new one will be created",
                    self.plan_path
                );
                PreviousRevisions::first_run()
            }
        };

        Ok(previous.with_legacy_main(legacy_main))
    }

    /// Replace the plan file with `pairs`, pretty-printed, mode 0644 on Unix.
    pub fn save(&self, pairs: &[VersionPair]) -> Result<()> {
        let bytes = to_pretty_json(pairs)?;

        let dir = match self.plan_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Write to a temp file in the same directory, then rename over the plan.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;

        // Temp files are created 0600; the runner may read the plan as another user.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(PLAN_FILE_MODE))?;
        }

        tmp.persist(&self.plan_path).map_err(|e| e.error)?;

        info!("Wrote {} pair(s) to {:?}", pairs.len(), self.plan_path);
        Ok(())
    }
}

/// JSON with four-space indentation, the layout the runner's tooling expects.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
