//! Manifest discovery and loading.
//!
//! Manifests are layered; later layers override earlier ones at the point of
//! conflict:
//!
//! 1. User global manifest (`~/.burrow/config.yml`)
//! 2. Project manifest (`.burrow/config.yml`)
//! 3. Local overrides (`.burrow/config.local.yml`)
//!
//! Layers are merged as raw YAML values before typed parsing, so a local
//! override can change a single field of one environment without repeating
//! the rest.

use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::BurrowConfig;
use crate::error::{BurrowError, Result};

/// Paths to manifest files in merge order.
#[derive(Debug, Clone)]
pub struct ManifestPaths {
    /// User's global manifest: ~/.burrow/config.yml
    pub user_global: Option<PathBuf>,

    /// Project manifest: .burrow/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .burrow/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ManifestPaths {
    /// Discover manifest files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: Self::find_user_global(),
            project: Self::find_existing(project_root, "config.yml"),
            project_local: Self::find_existing(project_root, "config.local.yml"),
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        let path = dirs::home_dir()?.join(".burrow").join("config.yml");
        path.exists().then_some(path)
    }

    fn find_existing(project_root: &Path, name: &str) -> Option<PathBuf> {
        let path = project_root.join(".burrow").join(name);
        path.exists().then_some(path)
    }

    /// All existing manifest paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .filter_map(|p| p.as_ref())
            .collect()
    }

    /// Check if the project manifest exists.
    pub fn has_project_manifest(&self) -> bool {
        self.project.is_some()
    }
}

/// Find the project root by walking up from a starting directory.
///
/// Looks for a `.burrow` directory first, then a `.git` directory.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(".burrow").is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single manifest file and parse it into [`BurrowConfig`].
///
/// # Errors
///
/// Returns `ManifestNotFound` if the file doesn't exist and
/// `ManifestParseError` if the YAML is invalid.
pub fn load_manifest_file(path: &Path) -> Result<BurrowConfig> {
    let content = read_manifest(path)?;
    parse_manifest(&content, path)
}

/// Parse YAML content into [`BurrowConfig`].
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<BurrowConfig> {
    // An empty file is a valid, empty manifest.
    if content.trim().is_empty() {
        return Ok(BurrowConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| BurrowError::ManifestParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BurrowError::ManifestNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BurrowError::Io(e)
        }
    })
}

fn load_manifest_value(path: &Path) -> Result<Value> {
    let content = read_manifest(path)?;
    serde_yaml::from_str(&content).map_err(|e| BurrowError::ManifestParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Deep merge two YAML values; overlay wins at the point of conflict.
///
/// Mappings merge recursively, a null in the overlay deletes the key, and
/// everything else is replaced wholesale.
fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Load and merge all manifest layers for a project.
///
/// # Errors
///
/// Returns `ManifestNotFound` if no project manifest exists and
/// `ManifestParseError` if any layer is invalid.
pub fn load_merged_manifest(project_root: &Path) -> Result<BurrowConfig> {
    let paths = ManifestPaths::discover(project_root);

    if !paths.has_project_manifest() {
        return Err(BurrowError::ManifestNotFound {
            path: project_root.join(".burrow").join("config.yml"),
        });
    }

    let merged = paths
        .all_existing()
        .into_iter()
        .map(|path| load_manifest_value(path))
        .try_fold(Value::Mapping(Default::default()), |acc, value| {
            Ok::<_, BurrowError>(deep_merge(&acc, &value?))
        })?;

    serde_yaml::from_value(merged).map_err(|e| BurrowError::ManifestParseError {
        path: project_root.join(".burrow").join("config.yml"),
        message: format!("Failed to parse merged manifest: {}", e),
    })
}

/// Load the manifest, honoring an explicit `--config` override.
///
/// With an override, only that file is loaded and no merging happens.
pub fn load_manifest(project_root: &Path, config_override: Option<&Path>) -> Result<BurrowConfig> {
    if let Some(override_path) = config_override {
        load_manifest_file(override_path)
    } else {
        load_merged_manifest(project_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_project_manifest(root: &Path, name: &str, content: &str) {
        let dir = root.join(".burrow");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn discover_finds_project_manifest() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(temp.path(), "config.yml", "environments: {}");

        let paths = ManifestPaths::discover(temp.path());
        assert!(paths.project.is_some());
        assert!(paths.has_project_manifest());
    }

    #[test]
    fn discover_finds_local_overrides() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(temp.path(), "config.yml", "");
        write_project_manifest(temp.path(), "config.local.yml", "");

        let paths = ManifestPaths::discover(temp.path());
        assert!(paths.project_local.is_some());
    }

    #[test]
    fn discover_returns_none_for_missing_manifests() {
        let temp = TempDir::new().unwrap();
        let paths = ManifestPaths::discover(temp.path());
        assert!(paths.project.is_none());
        assert!(paths.project_local.is_none());
        assert!(!paths.has_project_manifest());
    }

    #[test]
    fn find_project_root_finds_burrow_dir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("foo").join("bar");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".burrow")).unwrap();

        let root = find_project_root(&subdir);
        assert_eq!(root, Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_finds_git_dir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("src");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();

        let root = find_project_root(&subdir);
        assert_eq!(root, Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_prefers_burrow_over_git() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("nested").join("project");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::create_dir_all(subdir.join(".burrow")).unwrap();

        let root = find_project_root(&subdir);
        assert_eq!(root, Some(subdir));
    }

    #[test]
    fn load_manifest_file_parses_valid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "environments:\n  /opt/env: {}\n").unwrap();

        let config = load_manifest_file(&path).unwrap();
        assert!(config.environments.contains_key("/opt/env"));
    }

    #[test]
    fn load_manifest_file_returns_not_found_error() {
        let result = load_manifest_file(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(BurrowError::ManifestNotFound { .. })));
    }

    #[test]
    fn parse_manifest_returns_parse_error_for_invalid_yaml() {
        let content = "invalid: yaml: content: [";
        let result = parse_manifest(content, Path::new("test.yml"));
        assert!(matches!(result, Err(BurrowError::ManifestParseError { .. })));
    }

    #[test]
    fn parse_manifest_handles_empty_file() {
        let config = parse_manifest("", Path::new("test.yml")).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn deep_merge_replaces_at_conflict_point() {
        let base: Value = serde_yaml::from_str(
            r#"
environments:
  /opt/env:
    ensure: present
    system_site_packages: true
"#,
        )
        .unwrap();
        let overlay: Value = serde_yaml::from_str(
            r#"
environments:
  /opt/env:
    ensure: absent
"#,
        )
        .unwrap();

        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["environments"]["/opt/env"]["ensure"], "absent");
        assert_eq!(
            merged["environments"]["/opt/env"]["system_site_packages"],
            true
        );
    }

    #[test]
    fn deep_merge_null_deletes_key() {
        let base: Value = serde_yaml::from_str("a: 1\nb: 2").unwrap();
        let overlay: Value = serde_yaml::from_str("b: null").unwrap();

        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["a"], 1);
        assert!(merged.get("b").is_none());
    }

    #[test]
    fn load_merged_manifest_merges_project_and_local() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(
            temp.path(),
            "config.yml",
            r#"
environments:
  /opt/env:
    python: "3.9"
  /srv/other: {}
"#,
        );
        write_project_manifest(
            temp.path(),
            "config.local.yml",
            r#"
environments:
  /opt/env:
    python: "3.12"
"#,
        );

        let config = load_merged_manifest(temp.path()).unwrap();
        assert_eq!(
            config.environments["/opt/env"].python.as_deref(),
            Some("3.12")
        );
        assert!(config.environments.contains_key("/srv/other"));
    }

    #[test]
    fn load_merged_manifest_fails_without_project_manifest() {
        let temp = TempDir::new().unwrap();
        let result = load_merged_manifest(temp.path());
        assert!(matches!(result, Err(BurrowError::ManifestNotFound { .. })));
    }

    #[test]
    fn load_manifest_with_override_skips_merge() {
        let temp = TempDir::new().unwrap();
        let override_path = temp.path().join("custom.yml");
        fs::write(&override_path, "environments:\n  /custom/env: {}\n").unwrap();

        let config = load_manifest(temp.path(), Some(&override_path)).unwrap();
        assert!(config.environments.contains_key("/custom/env"));
    }

    #[test]
    fn load_manifest_without_override_uses_merge() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(temp.path(), "config.yml", "environments:\n  /opt/env: {}\n");

        let config = load_manifest(temp.path(), None).unwrap();
        assert!(config.environments.contains_key("/opt/env"));
    }
}
