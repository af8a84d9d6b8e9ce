//! Status command: show recorded state for each declared environment.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Command, CommandResult};
use crate::cli::args::StatusArgs;
use crate::config;
use crate::error::Result;
use crate::state::{ProjectId, StateStore};
use crate::ui::Output;

/// Reports what the last convergence did, per declared environment.
pub struct StatusCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: StatusArgs,
}

#[derive(Debug, Serialize)]
struct StatusEntry {
    environment: String,
    status: String,
    last_apply: Option<DateTime<Utc>>,
    duration_ms: Option<u64>,
}

impl StatusCommand {
    /// Create a status command.
    pub fn new(project_root: &Path, config_override: Option<PathBuf>, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override,
            args,
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, out: &Output) -> Result<CommandResult> {
        let manifest = config::load_manifest(&self.project_root, self.config_override.as_deref())?;
        let project_id = ProjectId::from_path(&self.project_root)?;
        let store = StateStore::load(&project_id)?;

        let entries: Vec<StatusEntry> = manifest
            .environments
            .keys()
            .map(|path| {
                let state = store.environments.get(path);
                StatusEntry {
                    environment: path.clone(),
                    status: store.env_status(path).to_string(),
                    last_apply: state.and_then(|s| s.last_apply),
                    duration_ms: state.and_then(|s| s.duration_ms),
                }
            })
            .collect();

        if self.args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&entries)
                    .map_err(|e| crate::error::BurrowError::Other(anyhow::anyhow!(e)))?
            );
            return Ok(CommandResult::success());
        }

        if entries.is_empty() {
            out.warning("No environments declared");
            return Ok(CommandResult::success());
        }

        out.header(&format!("Status for {}", project_id.name()));
        for entry in &entries {
            let when = entry
                .last_apply
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".to_string());
            out.message(&format!(
                "  {}  {}  {}",
                entry.environment, entry.status, when
            ));
        }

        if let Some(last) = store.last_apply {
            out.message(&format!(
                "Last apply: {}",
                last.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        Ok(CommandResult::success())
    }
}
