//! Terminal output.
//!
//! Burrow is non-interactive: no prompts, no spinners. This module provides
//! the output modes and a styled writer used by every command.

pub mod theme;

pub use theme::{should_use_colors, BurrowTheme};

use std::str::FromStr;

use crate::engine::ResourceResult;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all output including resource details.
    Verbose,
    /// Show progress and status only.
    #[default]
    Normal,
    /// Show final status only.
    Quiet,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows per-resource detail.
    pub fn shows_detail(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

/// Styled writer for command output.
///
/// Status goes to stdout, errors to stderr.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
    theme: BurrowTheme,
}

impl Output {
    /// Create a writer, picking colors from the terminal environment.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            BurrowTheme::new()
        } else {
            BurrowTheme::plain()
        };
        Self { mode, theme }
    }

    /// Create a writer with a fixed theme (tests).
    pub fn with_theme(mode: OutputMode, theme: BurrowTheme) -> Self {
        Self { mode, theme }
    }

    /// Current output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Print a plain message.
    pub fn message(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    /// Print a warning message.
    pub fn warning(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_warning(msg));
        }
    }

    /// Print an error message to stderr.
    ///
    /// Errors are never suppressed, regardless of mode.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    /// Print a section header.
    pub fn header(&self, title: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_header(title));
        }
    }

    /// Print one resource outcome line.
    pub fn resource(&self, result: &ResourceResult) {
        if !self.mode.shows_status() {
            return;
        }

        let line = match (&result.detail, self.mode.shows_detail()) {
            (Some(detail), true) => format!(
                "  {} {} {}",
                result.outcome.display_char(),
                result.id,
                self.theme.dim.apply_to(format!("({})", detail))
            ),
            _ => format!("  {} {}", result.outcome.display_char(), result.id),
        };
        println!("{}", line);
    }

    /// Print a command string in command styling.
    pub fn command(&self, command: &str) {
        if self.mode.shows_status() {
            println!("    {}", self.theme.command.apply_to(command));
        }
    }
}
