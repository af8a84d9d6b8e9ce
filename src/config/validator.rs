//! Manifest validation.
//!
//! Structural validity is serde's job; this module checks the values:
//! environment paths must be absolute and interpreter pins must parse.

use std::path::Path;

use crate::config::schema::BurrowConfig;
use crate::error::{BurrowError, Result};
use crate::facts::PythonVersion;

/// Validate a loaded manifest.
///
/// All problems are collected and reported in one error so a broken manifest
/// is fixed in one pass.
pub fn validate(config: &BurrowConfig) -> Result<()> {
    let mut problems = Vec::new();

    if let Some(pin) = &config.settings.python {
        if PythonVersion::parse(pin).is_none() {
            problems.push(format!("settings: unparsable python pin '{}'", pin));
        }
    }

    for (path, env) in &config.environments {
        if path.trim().is_empty() {
            problems.push("environment with empty path".to_string());
            continue;
        }

        if !Path::new(path).is_absolute() {
            problems.push(format!(
                "environment '{}': path must be absolute",
                path
            ));
        }

        if let Some(pin) = &env.python {
            if PythonVersion::parse(pin).is_none() {
                problems.push(format!(
                    "environment '{}': unparsable python pin '{}'",
                    path, pin
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(BurrowError::ManifestValidationError {
            message: problems.join("; "),
        })
    }
}
