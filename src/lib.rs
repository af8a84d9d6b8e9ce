//! Burrow - Declarative Python virtual environment management.
//!
//! Burrow replaces ad-hoc `pyvenv` invocations with a declarative YAML
//! manifest and an idempotent convergence engine: declare the environments a
//! machine should have, and `burrow apply` makes it so, skipping whatever is
//! already in the declared state.
//!
//! # Modules
//!
//! - [`catalog`] - Declaration compilation and resource value objects
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Manifest loading, parsing, and validation
//! - [`engine`] - Idempotent resource convergence
//! - [`error`] - Error types and result aliases
//! - [`facts`] - Environment facts (installed Python version)
//! - [`shell`] - Shell command execution
//! - [`state`] - Persistent convergence history
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use burrow::catalog::{compile, VenvSpec};
//! use burrow::facts::{Facts, PythonVersion};
//!
//! let spec = VenvSpec::present("/opt/env");
//! let facts = Facts::with_python(PythonVersion::new(3, 5, 1));
//!
//! let resources = compile(&spec, &facts).unwrap();
//! assert_eq!(resources.len(), 2);
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod facts;
pub mod shell;
pub mod state;
pub mod ui;

pub use error::{BurrowError, Result};
