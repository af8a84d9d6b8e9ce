//! Manifest schema definitions for Burrow.
//!
//! This module contains the struct definitions that map to the YAML manifest
//! format (`.burrow/config.yml`).
//!
//! ```yaml
//! settings:
//!   python: "3.11"          # optional global pin, skips discovery
//! environments:
//!   /opt/env:
//!     ensure: present
//!     system_site_packages: true
//!   /srv/legacy/env:
//!     ensure: absent
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Ensure;

/// Root manifest structure.
// BTreeMap keys keep plan and apply output in stable path order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurrowConfig {
    /// Global settings.
    pub settings: Settings,

    /// Declared environments, keyed by target path.
    #[serde(default)]
    pub environments: BTreeMap<String, EnvConfig>,
}

impl BurrowConfig {
    /// Whether the manifest declares any environments.
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

/// Global settings that apply to all environments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interpreter version used for every environment without its own pin.
    /// When set, system discovery is skipped entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// History retention count for recorded runs.
    #[serde(
        default = "default_history_retention",
        skip_serializing_if = "is_default_history_retention"
    )]
    pub history_retention: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            python: None,
            history_retention: default_history_retention(),
        }
    }
}

fn default_history_retention() -> usize {
    50
}

fn is_default_history_retention(v: &usize) -> bool {
    *v == default_history_retention()
}

fn is_false(v: &bool) -> bool {
    !v
}

fn is_present(e: &Ensure) -> bool {
    *e == Ensure::Present
}

/// Configuration for a single declared environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Desired state (defaults to present).
    #[serde(skip_serializing_if = "is_present")]
    pub ensure: Ensure,

    /// Interpreter version pin for this environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Give the environment access to system site-packages.
    #[serde(default, skip_serializing_if = "is_false")]
    pub system_site_packages: bool,
}
