//! Init command: scaffold a Burrow manifest.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Command, CommandResult};
use crate::cli::args::InitArgs;
use crate::error::Result;
use crate::ui::Output;

/// Starter manifest written by `burrow init`.
const DEFAULT_MANIFEST: &str = r#"# Burrow manifest. Declare the Python virtual environments this
# project needs; `burrow apply` converges the machine to match.
#
# settings:
#   python: "3.11"            # pin the interpreter instead of discovering it
#
# environments:
#   /opt/env:
#     system_site_packages: true
#   /srv/legacy/env:
#     ensure: absent

environments: {}
"#;

/// Creates `.burrow/config.yml` for a project.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    /// Create an init command.
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for InitCommand {
    fn execute(&self, out: &Output) -> Result<CommandResult> {
        let dir = self.project_root.join(".burrow");
        let path = dir.join("config.yml");

        if path.exists() && !self.args.force {
            return Err(anyhow::anyhow!(
                "Manifest already exists at {}; use --force to overwrite",
                path.display()
            )
            .into());
        }

        fs::create_dir_all(&dir)?;
        fs::write(&path, DEFAULT_MANIFEST)?;

        out.success(&format!("Created {}", path.display()));
        Ok(CommandResult::success())
    }
}
