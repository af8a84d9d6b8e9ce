//! Manifest loading, parsing, and validation.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_root, load_manifest, load_manifest_file, load_merged_manifest, parse_manifest,
    ManifestPaths,
};
pub use schema::{BurrowConfig, EnvConfig, Settings};
pub use validator::validate;
