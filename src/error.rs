//! Error types for Burrow operations.
//!
//! This module defines [`BurrowError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `BurrowError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `BurrowError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Burrow operations.
#[derive(Debug, Error)]
pub enum BurrowError {
    /// Manifest file not found at expected location.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to parse manifest file.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// Invalid manifest structure or values.
    #[error("Invalid manifest: {message}")]
    ManifestValidationError { message: String },

    /// No usable Python interpreter for a declaration that needs one.
    #[error("python3 is required for '{path}': no usable interpreter found")]
    PythonMissing { path: String },

    /// Discovered or pinned interpreter is older than the supported minimum.
    #[error("python3 is required for '{path}': found {found}, need {minimum} or newer")]
    PythonTooOld {
        path: String,
        found: String,
        minimum: String,
    },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Burrow operations.
pub type Result<T> = std::result::Result<T, BurrowError>;
