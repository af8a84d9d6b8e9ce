//! Apply command: converge declared environments.

use std::path::{Path, PathBuf};

use super::{collect_specs, load_context, Command, CommandResult};
use crate::catalog::{compile, VenvSpec};
use crate::cli::args::ApplyArgs;
use crate::engine::{ApplySummary, Engine, Outcome};
use crate::error::{BurrowError, Result};
use crate::state::{EnvStatus, ProjectId, StateStore};
use crate::ui::Output;

/// Converges every declared environment, one at a time.
pub struct ApplyCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: ApplyArgs,
}

impl ApplyCommand {
    /// Create an apply command.
    pub fn new(project_root: &Path, config_override: Option<PathBuf>, args: ApplyArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override,
            args,
        }
    }

    /// Keep only environments named by `--only`, when given.
    fn filter_specs(&self, specs: Vec<VenvSpec>) -> Result<Vec<VenvSpec>> {
        if self.args.only.is_empty() {
            return Ok(specs);
        }

        for name in &self.args.only {
            if !specs.iter().any(|s| s.path.as_os_str() == name.as_str()) {
                return Err(BurrowError::ManifestValidationError {
                    message: format!("--only names undeclared environment '{}'", name),
                });
            }
        }

        Ok(specs
            .into_iter()
            .filter(|s| {
                self.args
                    .only
                    .iter()
                    .any(|name| s.path.as_os_str() == name.as_str())
            })
            .collect())
    }

    fn env_status(summary: &ApplySummary) -> EnvStatus {
        if summary.failed() > 0 {
            EnvStatus::Failed
        } else if summary.applied() > 0 {
            EnvStatus::Changed
        } else {
            EnvStatus::InSync
        }
    }
}

impl Command for ApplyCommand {
    fn execute(&self, out: &Output) -> Result<CommandResult> {
        let ctx = load_context(&self.project_root, self.config_override.as_deref())?;

        if ctx.config.is_empty() {
            out.warning("No environments declared");
            return Ok(CommandResult::success());
        }

        let specs = self.filter_specs(collect_specs(&ctx.config)?)?;

        let action = if self.args.dry_run {
            "Previewing"
        } else {
            "Applying"
        };
        out.header(&format!("{} {} environment(s)", action, specs.len()));

        let engine = Engine::new(self.args.dry_run);
        let mut total = ApplySummary::default();
        let mut state = if self.args.dry_run {
            None
        } else {
            let project_id = ProjectId::from_path(&self.project_root)?;
            Some((StateStore::load(&project_id)?, project_id))
        };

        for spec in &specs {
            let path = spec.path.display().to_string();
            out.message(&path);

            let summary = match compile(spec, &ctx.facts) {
                Ok(resources) => engine.apply(&resources),
                Err(e) => {
                    let mut failed = ApplySummary::default();
                    failed.push_failure(&path, e.to_string());
                    failed
                }
            };

            for result in &summary.results {
                out.resource(result);
                if result.outcome == Outcome::Failed {
                    if let Some(detail) = &result.detail {
                        out.error(&format!("{}: {}", result.id, detail));
                    }
                }
            }

            if let Some((store, _)) = state.as_mut() {
                let duration_ms: u64 = summary
                    .results
                    .iter()
                    .map(|r| r.duration.as_millis() as u64)
                    .sum();
                store.record_env(&path, Self::env_status(&summary), duration_ms);
            }

            total.extend(summary);
        }

        if let Some((mut store, project_id)) = state {
            store.record_run(
                total.applied(),
                total.unchanged(),
                total.failed(),
                ctx.config.settings.history_retention,
            );
            store.save(&project_id)?;
        }

        if self.args.dry_run {
            out.message(&format!(
                "dry-run: {} resource(s) would change, {} in sync",
                total.would_apply(),
                total.unchanged()
            ));
        }

        if total.success() {
            out.success(&format!(
                "Converged: {} applied, {} unchanged",
                total.applied(),
                total.unchanged()
            ));
            Ok(CommandResult::success())
        } else {
            out.error(&format!("{} resource(s) failed", total.failed()));
            Ok(CommandResult::failure(1))
        }
    }
}
