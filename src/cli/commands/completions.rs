//! Completions command: shell completion generation.

use clap::CommandFactory;
use clap_complete::generate;

use super::{Command, CommandResult};
use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;
use crate::ui::Output;

/// Generates completion scripts to stdout.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _out: &Output) -> Result<CommandResult> {
        let mut cmd = Cli::command();
        generate(self.args.shell, &mut cmd, "burrow", &mut std::io::stdout());
        Ok(CommandResult::success())
    }
}
