//! Python interpreter version parsing and derivation.
//!
//! The venv creation command is built from the interpreter's `major.minor`
//! pair: a `3.5.1` interpreter is driven through the `pyvenv-3.5` binary.

use std::fmt;

use serde::Serialize;

/// A parsed Python interpreter version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PythonVersion {
    /// Oldest interpreter that ships the `pyvenv` launcher burrow drives.
    pub const MINIMUM: PythonVersion = PythonVersion {
        major: 3,
        minor: 5,
        patch: 0,
    };

    /// Create a version from its components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from a string like `"3.5.1"` or `"3.5"`.
    ///
    /// The string may carry surrounding text (`"Python 3.5.1"`); the first
    /// version-shaped token wins. Returns `None` when no version is found.
    pub fn parse(s: &str) -> Option<Self> {
        let re = regex::Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").ok()?;
        let caps = re.captures(s)?;

        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);

        Some(Self::new(major, minor, patch))
    }

    /// Render the `major.minor` pair, e.g. `"3.5"`.
    pub fn major_minor(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Name of the venv creation binary for this version, e.g. `"pyvenv-3.5"`.
    pub fn interpreter(&self) -> String {
        format!("pyvenv-{}", self.major_minor())
    }

    /// Whether this version meets the supported minimum.
    pub fn meets_minimum(&self) -> bool {
        *self >= Self::MINIMUM
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_version() {
        let v = PythonVersion::parse("3.5.1").unwrap();
        assert_eq!(v, PythonVersion::new(3, 5, 1));
    }

    #[test]
    fn parse_major_minor_defaults_patch() {
        let v = PythonVersion::parse("3.11").unwrap();
        assert_eq!(v, PythonVersion::new(3, 11, 0));
    }

    #[test]
    fn parse_from_interpreter_banner() {
        let v = PythonVersion::parse("Python 3.9.18").unwrap();
        assert_eq!(v, PythonVersion::new(3, 9, 18));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(PythonVersion::parse("no version here").is_none());
        assert!(PythonVersion::parse("").is_none());
    }

    #[test]
    fn major_minor_renders_pair() {
        assert_eq!(PythonVersion::new(3, 5, 1).major_minor(), "3.5");
        assert_eq!(PythonVersion::new(3, 12, 4).major_minor(), "3.12");
    }

    #[test]
    fn interpreter_derives_from_major_minor() {
        assert_eq!(PythonVersion::new(3, 5, 1).interpreter(), "pyvenv-3.5");
        assert_eq!(PythonVersion::new(3, 10, 0).interpreter(), "pyvenv-3.10");
    }

    #[test]
    fn minimum_is_three_five() {
        assert!(PythonVersion::new(3, 5, 0).meets_minimum());
        assert!(PythonVersion::new(3, 5, 1).meets_minimum());
        assert!(PythonVersion::new(3, 12, 0).meets_minimum());
        assert!(!PythonVersion::new(3, 4, 10).meets_minimum());
        assert!(!PythonVersion::new(2, 7, 18).meets_minimum());
    }

    #[test]
    fn ordering_is_numeric_not_lexical() {
        assert!(PythonVersion::new(3, 10, 0) > PythonVersion::new(3, 9, 18));
    }

    #[test]
    fn display_renders_full_triple() {
        assert_eq!(PythonVersion::new(3, 5, 1).to_string(), "3.5.1");
    }
}
