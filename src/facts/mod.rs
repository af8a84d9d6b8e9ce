//! Environment facts consumed at declaration-evaluation time.
//!
//! The only fact burrow needs is the installed Python version, which selects
//! the venv creation binary (`pyvenv-X.Y`). Facts are gathered once per run
//! by probing well-known interpreter names; a per-environment `python:` pin
//! in the manifest takes precedence over the discovered value.

pub mod python;

pub use python::PythonVersion;

use std::process::Command;

/// Interpreter names probed in order; the first that reports a version wins.
const INTERPRETER_CANDIDATES: &[&str] = &["python3", "python"];

/// Externally supplied environment attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Facts {
    /// Installed Python version, if an interpreter was found.
    pub python_version: Option<PythonVersion>,
}

impl Facts {
    /// Facts with a known Python version (manifest pins, tests).
    pub fn with_python(version: PythonVersion) -> Self {
        Self {
            python_version: Some(version),
        }
    }

    /// Facts with no interpreter available.
    pub fn none() -> Self {
        Self {
            python_version: None,
        }
    }

    /// Gather facts from the running system.
    pub fn gather() -> Self {
        for candidate in INTERPRETER_CANDIDATES {
            if let Some(version) = probe_interpreter(candidate) {
                tracing::debug!("discovered {} via {}", version, candidate);
                return Self::with_python(version);
            }
        }

        tracing::debug!("no python interpreter found on PATH");
        Self::none()
    }
}

/// Run `<binary> --version` and extract the reported version.
///
/// Python 2 printed its banner to stderr, Python 3 to stdout; both streams
/// are searched so an ancient interpreter is still reported (and later
/// rejected by the minimum-version check rather than mistaken for missing).
fn probe_interpreter(binary: &str) -> Option<PythonVersion> {
    let output = Command::new(binary).arg("--version").output().ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    PythonVersion::parse(&stdout).or_else(|| PythonVersion::parse(&stderr))
}
