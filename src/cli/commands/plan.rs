//! Plan command: show the compiled resource catalog.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{collect_specs, load_context, Command, CommandResult};
use crate::catalog::{compile, Resource};
use crate::cli::args::PlanArgs;
use crate::error::Result;
use crate::ui::Output;

/// Compiles every declaration and prints the result without applying it.
pub struct PlanCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: PlanArgs,
}

/// One environment's slice of the plan.
#[derive(Debug, Serialize)]
struct PlanEntry {
    environment: String,
    resources: Vec<Resource>,
}

impl PlanCommand {
    /// Create a plan command.
    pub fn new(project_root: &Path, config_override: Option<PathBuf>, args: PlanArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override,
            args,
        }
    }
}

impl Command for PlanCommand {
    fn execute(&self, out: &Output) -> Result<CommandResult> {
        let ctx = load_context(&self.project_root, self.config_override.as_deref())?;
        let specs = collect_specs(&ctx.config)?;

        let mut entries = Vec::with_capacity(specs.len());
        for spec in &specs {
            entries.push(PlanEntry {
                environment: spec.path.display().to_string(),
                resources: compile(spec, &ctx.facts)?,
            });
        }

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

        out.header(&format!("Plan: {} environment(s)", entries.len()));
        for entry in &entries {
            out.message(&format!("{}:", entry.environment));
            for resource in &entry.resources {
                out.message(&format!("  {}", resource.id()));
                if let Resource::Exec(exec) = resource {
                    out.command(&exec.command);
                }
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BurrowError;
    use crate::ui::{BurrowTheme, OutputMode};
    use std::fs;
    use tempfile::TempDir;

    fn quiet_out() -> Output {
        Output::with_theme(OutputMode::Quiet, BurrowTheme::plain())
    }

    fn write_manifest(root: &Path, content: &str) {
        let dir = root.join(".burrow");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), content).unwrap();
    }

    #[test]
    fn plan_fails_without_manifest() {
        let temp = TempDir::new().unwrap();
        let cmd = PlanCommand::new(temp.path(), None, PlanArgs::default());

        let result = cmd.execute(&quiet_out());
        assert!(matches!(result, Err(BurrowError::ManifestNotFound { .. })));
    }

    #[test]
    fn plan_compiles_pinned_environment() {
        let temp = TempDir::new().unwrap();
        write_manifest(
            temp.path(),
            "environments:\n  /opt/env:\n    python: \"3.5.1\"\n",
        );

        let cmd = PlanCommand::new(temp.path(), None, PlanArgs::default());
        let result = cmd.execute(&quiet_out()).unwrap();
        assert!(result.success);
    }

    #[test]
    fn plan_propagates_python_errors() {
        let temp = TempDir::new().unwrap();
        write_manifest(
            temp.path(),
            "environments:\n  /opt/env:\n    python: \"3.4.0\"\n",
        );

        let cmd = PlanCommand::new(temp.path(), None, PlanArgs::default());
        let result = cmd.execute(&quiet_out());
        assert!(matches!(result, Err(BurrowError::PythonTooOld { .. })));
    }
}
