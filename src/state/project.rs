//! Project identification and hashing.
//!
//! State is stored per project under the user's home directory, keyed by a
//! stable hash of the project's canonical path.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId {
    /// SHA256 hash of the canonical project path.
    hash: String,
    /// Absolute path to the project root.
    path: PathBuf,
}

impl ProjectId {
    /// Create a ProjectId from a project path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be canonicalized (e.g. it doesn't
    /// exist).
    pub fn from_path(path: &Path) -> Result<Self> {
        let abs_path = path.canonicalize().map_err(crate::error::BurrowError::Io)?;
        let hash = Self::compute_hash(&abs_path);

        Ok(Self {
            hash,
            path: abs_path,
        })
    }

    /// Get the hash as a string (16 hex chars, 8 bytes of SHA256).
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Get the project path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the project name (directory name).
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
    }

    fn compute_hash(path: &Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(path.to_string_lossy().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}
