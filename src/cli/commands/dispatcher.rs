//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::Output;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, out: &Output) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, out: &Output) -> Result<CommandResult> {
        let config = cli.config.clone();

        match &cli.command {
            Some(Commands::Apply(args)) => {
                let cmd = super::apply::ApplyCommand::new(&self.project_root, config, args.clone());
                cmd.execute(out)
            }
            Some(Commands::Plan(args)) => {
                let cmd = super::plan::PlanCommand::new(&self.project_root, config, args.clone());
                cmd.execute(out)
            }
            Some(Commands::Status(args)) => {
                let cmd =
                    super::status::StatusCommand::new(&self.project_root, config, args.clone());
                cmd.execute(out)
            }
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(&self.project_root, config, args.clone());
                cmd.execute(out)
            }
            Some(Commands::Init(args)) => {
                let cmd = super::init::InitCommand::new(&self.project_root, args.clone());
                cmd.execute(out)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(out)
            }
            None => {
                // Bare `burrow` converges, like a config tool should.
                let cmd = super::apply::ApplyCommand::new(
                    &self.project_root,
                    config,
                    crate::cli::args::ApplyArgs::default(),
                );
                cmd.execute(out)
            }
        }
    }
}
