//! Persistent state storage.
//!
//! Tracks, per project, what the last convergence did to each declared
//! environment plus a bounded run history. State lives outside the project
//! tree (under `~/.burrow/`) so it never dirties the repository being
//! managed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::ProjectId;
use crate::error::{BurrowError, Result};

/// Persistent state for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateStore {
    /// Schema version for migration.
    pub version: u32,

    /// Project identification.
    pub project: ProjectInfo,

    /// Last apply timestamp.
    pub last_apply: Option<DateTime<Utc>>,

    /// State for each declared environment, keyed by target path.
    #[serde(default)]
    pub environments: BTreeMap<String, EnvState>,

    /// Run history (most recent first).
    #[serde(default)]
    pub runs: Vec<RunRecord>,
}

/// Project information stored in state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub path: String,
    pub name: String,
}

/// State for a single environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvState {
    /// When this environment was last converged.
    pub last_apply: Option<DateTime<Utc>>,

    /// Status after the last convergence.
    pub status: EnvStatus,

    /// Duration of the last convergence in milliseconds.
    pub duration_ms: Option<u64>,
}

/// Status of an environment after convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvStatus {
    /// Already matched the declaration; nothing was done.
    InSync,
    /// One or more resources were applied.
    Changed,
    /// One or more resources failed.
    Failed,
    /// Declared but never applied.
    NeverApplied,
}

impl std::fmt::Display for EnvStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnvStatus::InSync => "in sync",
            EnvStatus::Changed => "changed",
            EnvStatus::Failed => "failed",
            EnvStatus::NeverApplied => "never applied",
        };
        write!(f, "{}", s)
    }
}

/// One recorded convergence run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: DateTime<Utc>,
    pub applied: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl StateStore {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new state store for a project.
    pub fn new(project_id: &ProjectId) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            project: ProjectInfo {
                path: project_id.path().to_string_lossy().to_string(),
                name: project_id.name().to_string(),
            },
            last_apply: None,
            environments: BTreeMap::new(),
            runs: Vec::new(),
        }
    }

    /// Get the state directory for a project.
    pub fn state_dir(project_id: &ProjectId) -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join(".burrow")
            .join("projects")
            .join(project_id.hash())
    }

    /// Get the state file path.
    pub fn state_file(project_id: &ProjectId) -> PathBuf {
        Self::state_dir(project_id).join("state.yml")
    }

    /// Load state from disk, or start fresh when none exists.
    pub fn load(project_id: &ProjectId) -> Result<Self> {
        let path = Self::state_file(project_id);

        if !path.exists() {
            return Ok(Self::new(project_id));
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            BurrowError::Other(anyhow::anyhow!(
                "corrupt state file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save state to disk using atomic write.
    ///
    /// Write-to-temp-then-rename, so a crash mid-write never leaves a
    /// partially written state file.
    pub fn save(&self, project_id: &ProjectId) -> Result<()> {
        let dir = Self::state_dir(project_id);
        fs::create_dir_all(&dir)?;

        let path = Self::state_file(project_id);
        let content =
            serde_yaml::to_string(self).map_err(|e| BurrowError::Other(anyhow::anyhow!(e)))?;

        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Record the outcome of converging one environment.
    pub fn record_env(&mut self, path: &str, status: EnvStatus, duration_ms: u64) {
        self.environments.insert(
            path.to_string(),
            EnvState {
                last_apply: Some(Utc::now()),
                status,
                duration_ms: Some(duration_ms),
            },
        );
    }

    /// Record a completed run, trimming history to the retention bound.
    pub fn record_run(
        &mut self,
        applied: usize,
        unchanged: usize,
        failed: usize,
        retention: usize,
    ) {
        self.last_apply = Some(Utc::now());
        self.runs.insert(
            0,
            RunRecord {
                timestamp: Utc::now(),
                applied,
                unchanged,
                failed,
            },
        );
        self.runs.truncate(retention);
    }

    /// Status for one environment, `NeverApplied` when unknown.
    pub fn env_status(&self, path: &str) -> EnvStatus {
        self.environments
            .get(path)
            .map(|s| s.status)
            .unwrap_or(EnvStatus::NeverApplied)
    }
}
