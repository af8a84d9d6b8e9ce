//! CLI command implementations.

pub mod apply;
pub mod completions;
pub mod dispatcher;
pub mod init;
pub mod list;
pub mod plan;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::path::Path;

use crate::catalog::VenvSpec;
use crate::config::{self, BurrowConfig};
use crate::error::Result;
use crate::facts::{Facts, PythonVersion};

/// Loaded manifest plus the facts it resolves against.
pub(crate) struct ManifestContext {
    pub config: BurrowConfig,
    pub facts: Facts,
}

/// Load and validate the manifest, then resolve facts.
///
/// A global `settings.python` pin replaces system discovery entirely; the
/// validator has already confirmed it parses.
pub(crate) fn load_context(
    project_root: &Path,
    config_override: Option<&Path>,
) -> Result<ManifestContext> {
    let config = config::load_manifest(project_root, config_override)?;
    config::validate(&config)?;

    let facts = config
        .settings
        .python
        .as_deref()
        .and_then(PythonVersion::parse)
        .map(Facts::with_python)
        .unwrap_or_else(Facts::gather);

    Ok(ManifestContext { config, facts })
}

/// Build specs for every declared environment, in path order.
pub(crate) fn collect_specs(config: &BurrowConfig) -> Result<Vec<VenvSpec>> {
    config
        .environments
        .iter()
        .map(|(path, env)| VenvSpec::from_config(path, env))
        .collect()
}
