//! Resource value objects.
//!
//! A compiled declaration is a short list of resources: plain data describing
//! one idempotent side effect each. The engine applies them; nothing here
//! touches the filesystem.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Desired state of a managed resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl std::fmt::Display for Ensure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ensure::Present => write!(f, "present"),
            Ensure::Absent => write!(f, "absent"),
        }
    }
}

/// A managed directory on disk (the venv root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResource {
    /// Directory the resource manages.
    pub path: PathBuf,

    /// Desired state.
    pub ensure: Ensure,

    /// Remove contents along with the directory when absent.
    pub purge: bool,
}

/// A command execution with an idempotence guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecResource {
    /// Stable resource name, derived from the target path.
    pub name: String,

    /// Shell command to run.
    pub command: String,

    /// Guard path: when it exists, the command has already been applied.
    pub creates: PathBuf,
}

/// A single compiled resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resource {
    File(FileResource),
    Exec(ExecResource),
}

impl Resource {
    /// Display identifier, e.g. `File[/opt/env]` or
    /// `Exec[python_virtualenv_/opt/env]`.
    pub fn id(&self) -> String {
        match self {
            Resource::File(f) => format!("File[{}]", f.path.display()),
            Resource::Exec(e) => format!("Exec[{}]", e.name),
        }
    }
}
