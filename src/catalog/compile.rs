//! Declaration compilation.
//!
//! [`compile`] is the heart of burrow: a pure translation from one declared
//! environment plus the gathered facts into the resource list that realizes
//! it. No I/O happens here, and the same inputs always produce the same
//! resources, which is what makes re-applying a manifest safe.

use std::path::{Path, PathBuf};

use crate::catalog::resource::{Ensure, ExecResource, FileResource, Resource};
use crate::config::EnvConfig;
use crate::error::{BurrowError, Result};
use crate::facts::{Facts, PythonVersion};

/// Marker file CPython's venv machinery writes into a created environment.
/// Its presence is the idempotence guard for the creation command.
const VENV_MARKER: &str = "pyvenv.cfg";

/// A fully specified virtual environment declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvSpec {
    /// Target directory; doubles as the declaration's identifier.
    pub path: PathBuf,

    /// Desired state.
    pub ensure: Ensure,

    /// Interpreter version pinned in the manifest, overriding discovery.
    pub python: Option<PythonVersion>,

    /// Give the environment access to system site-packages.
    pub system_site_packages: bool,
}

impl VenvSpec {
    /// Declaration for an environment that should exist.
    pub fn present(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ensure: Ensure::Present,
            python: None,
            system_site_packages: false,
        }
    }

    /// Declaration for an environment that should be removed.
    pub fn absent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ensure: Ensure::Absent,
            python: None,
            system_site_packages: false,
        }
    }

    /// Build a spec from a manifest entry.
    ///
    /// # Errors
    ///
    /// Returns `ManifestValidationError` when the `python:` pin does not
    /// parse as a version.
    pub fn from_config(path: &str, config: &EnvConfig) -> Result<Self> {
        let python = match &config.python {
            Some(pin) => Some(PythonVersion::parse(pin).ok_or_else(|| {
                BurrowError::ManifestValidationError {
                    message: format!("environment '{}': unparsable python pin '{}'", path, pin),
                }
            })?),
            None => None,
        };

        Ok(Self {
            path: PathBuf::from(path),
            ensure: config.ensure,
            python,
            system_site_packages: config.system_site_packages,
        })
    }
}

/// Name of the command-execution resource for a target path.
pub fn exec_name(path: &Path) -> String {
    format!("python_virtualenv_{}", path.display())
}

/// Compile one declaration into its resource list.
///
/// `ensure: present` yields the directory resource plus the creation command;
/// `ensure: absent` yields only the directory resource, marked for purge.
/// The command string carries a single optional-flag slot between `--clear`
/// and the path; an empty slot leaves two spaces.
///
/// # Errors
///
/// A `present` declaration needs an interpreter version (pin or fact):
/// missing gives `PythonMissing`, below the supported minimum gives
/// `PythonTooOld`. An `absent` declaration compiles without one.
pub fn compile(spec: &VenvSpec, facts: &Facts) -> Result<Vec<Resource>> {
    match spec.ensure {
        Ensure::Absent => Ok(vec![Resource::File(FileResource {
            path: spec.path.clone(),
            ensure: Ensure::Absent,
            purge: true,
        })]),
        Ensure::Present => {
            let version = spec.python.or(facts.python_version).ok_or_else(|| {
                BurrowError::PythonMissing {
                    path: spec.path.display().to_string(),
                }
            })?;

            if !version.meets_minimum() {
                return Err(BurrowError::PythonTooOld {
                    path: spec.path.display().to_string(),
                    found: version.to_string(),
                    minimum: PythonVersion::MINIMUM.major_minor(),
                });
            }

            let flags = if spec.system_site_packages {
                "--system-site-packages"
            } else {
                ""
            };
            let command = format!(
                "{} --clear {} {}",
                version.interpreter(),
                flags,
                spec.path.display()
            );

            Ok(vec![
                Resource::File(FileResource {
                    path: spec.path.clone(),
                    ensure: Ensure::Present,
                    purge: false,
                }),
                Resource::Exec(ExecResource {
                    name: exec_name(&spec.path),
                    command,
                    creates: spec.path.join(VENV_MARKER),
                }),
            ])
        }
    }
}
