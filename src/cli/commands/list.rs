//! List command: show declared environments.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{Command, CommandResult};
use crate::cli::args::ListArgs;
use crate::config;
use crate::error::Result;
use crate::ui::Output;

/// Lists the environments a manifest declares.
pub struct ListCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: ListArgs,
}

#[derive(Debug, Serialize)]
struct ListEntry {
    environment: String,
    ensure: String,
    python: Option<String>,
    system_site_packages: bool,
}

impl ListCommand {
    /// Create a list command.
    pub fn new(project_root: &Path, config_override: Option<PathBuf>, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override,
            args,
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, out: &Output) -> Result<CommandResult> {
        let manifest = config::load_manifest(&self.project_root, self.config_override.as_deref())?;

        let entries: Vec<ListEntry> = manifest
            .environments
            .iter()
            .map(|(path, env)| ListEntry {
                environment: path.clone(),
                ensure: env.ensure.to_string(),
                python: env.python.clone(),
                system_site_packages: env.system_site_packages,
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

        out.header(&format!("{} environment(s)", entries.len()));
        for entry in &entries {
            let mut line = format!("  {}  ensure={}", entry.environment, entry.ensure);
            if let Some(python) = &entry.python {
                line.push_str(&format!("  python={}", python));
            }
            if entry.system_site_packages {
                line.push_str("  system-site-packages");
            }
            out.message(&line);
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

    #[test]
    fn list_fails_without_manifest() {
        let temp = TempDir::new().unwrap();
        let cmd = ListCommand::new(temp.path(), None, ListArgs::default());

        let result = cmd.execute(&quiet_out());
        assert!(matches!(result, Err(BurrowError::ManifestNotFound { .. })));
    }

    #[test]
    fn list_succeeds_with_declared_environments() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".burrow");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.yml"),
            "environments:\n  /opt/env:\n    ensure: absent\n",
        )
        .unwrap();

        let cmd = ListCommand::new(temp.path(), None, ListArgs::default());
        let result = cmd.execute(&quiet_out()).unwrap();
        assert!(result.success);
    }
}
