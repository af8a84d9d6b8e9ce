//! Resource convergence engine.
//!
//! The engine takes a compiled resource list and brings the machine to the
//! declared state, one resource at a time. Work already done is skipped: a
//! directory that exists is left alone, a creation command whose `creates`
//! guard is present is not re-run. Re-applying an unchanged manifest is
//! therefore a no-op.
//!
//! A failing resource does not abort the run; the failure is recorded and
//! remaining resources still converge.

use std::fs;
use std::time::{Duration, Instant};

use crate::catalog::{Ensure, ExecResource, FileResource, Resource};
use crate::shell;

/// What happened to a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Resource was out of sync and has been brought to the declared state.
    Applied,

    /// Resource already matched the declared state.
    Unchanged,

    /// Resource is out of sync; dry-run, nothing was touched.
    WouldApply,

    /// Resource could not be brought to the declared state.
    Failed,
}

impl Outcome {
    /// Display character for this outcome.
    pub fn display_char(&self) -> char {
        match self {
            Outcome::Applied => '✓',
            Outcome::Unchanged => '○',
            Outcome::WouldApply => '◉',
            Outcome::Failed => '✗',
        }
    }

    /// Whether this outcome counts as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::Applied => "applied",
            Outcome::Unchanged => "unchanged",
            Outcome::WouldApply => "would apply",
            Outcome::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Result of converging a single resource.
#[derive(Debug, Clone)]
pub struct ResourceResult {
    /// Resource identifier (e.g. `File[/opt/env]`).
    pub id: String,

    /// What happened.
    pub outcome: Outcome,

    /// Human-readable detail (what changed, or why it failed).
    pub detail: Option<String>,

    /// Time spent on this resource.
    pub duration: Duration,
}

/// Aggregated results of one convergence run.
#[derive(Debug, Default)]
pub struct ApplySummary {
    /// Per-resource results in application order.
    pub results: Vec<ResourceResult>,
}

impl ApplySummary {
    fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Number of resources brought into sync.
    pub fn applied(&self) -> usize {
        self.count(Outcome::Applied)
    }

    /// Number of resources already in sync.
    pub fn unchanged(&self) -> usize {
        self.count(Outcome::Unchanged)
    }

    /// Number of resources that would change (dry-run).
    pub fn would_apply(&self) -> usize {
        self.count(Outcome::WouldApply)
    }

    /// Number of resources that failed.
    pub fn failed(&self) -> usize {
        self.count(Outcome::Failed)
    }

    /// Whether the run converged without failures.
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    /// Fold another summary into this one.
    pub fn extend(&mut self, other: ApplySummary) {
        self.results.extend(other.results);
    }

    /// Record a failure that happened before any resource ran
    /// (e.g. a declaration that failed to compile).
    pub fn push_failure(&mut self, id: impl Into<String>, detail: impl Into<String>) {
        self.results.push(ResourceResult {
            id: id.into(),
            outcome: Outcome::Failed,
            detail: Some(detail.into()),
            duration: Duration::ZERO,
        });
    }
}

/// Sequential, idempotent resource application.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    dry_run: bool,
}

impl Engine {
    /// Create an engine; with `dry_run` nothing on disk is touched.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Converge a resource list.
    pub fn apply(&self, resources: &[Resource]) -> ApplySummary {
        let mut summary = ApplySummary::default();

        for resource in resources {
            let start = Instant::now();
            let (outcome, detail) = match resource {
                Resource::File(file) => self.apply_file(file),
                Resource::Exec(exec) => self.apply_exec(exec),
            };

            tracing::debug!("{}: {}", resource.id(), outcome);

            summary.results.push(ResourceResult {
                id: resource.id(),
                outcome,
                detail,
                duration: start.elapsed(),
            });
        }

        summary
    }

    fn apply_file(&self, file: &FileResource) -> (Outcome, Option<String>) {
        match file.ensure {
            Ensure::Present => {
                if file.path.is_dir() {
                    return (Outcome::Unchanged, None);
                }
                if file.path.exists() {
                    return (
                        Outcome::Failed,
                        Some(format!(
                            "{} exists but is not a directory",
                            file.path.display()
                        )),
                    );
                }
                if self.dry_run {
                    return (Outcome::WouldApply, Some("create directory".to_string()));
                }
                match fs::create_dir_all(&file.path) {
                    Ok(()) => (Outcome::Applied, Some("created directory".to_string())),
                    Err(e) => (Outcome::Failed, Some(e.to_string())),
                }
            }
            Ensure::Absent => {
                if !file.path.exists() {
                    return (Outcome::Unchanged, None);
                }
                if self.dry_run {
                    return (Outcome::WouldApply, Some("remove and purge".to_string()));
                }
                let removal = if !file.path.is_dir() {
                    fs::remove_file(&file.path)
                } else if file.purge {
                    // purge: the whole tree goes, managed or not
                    fs::remove_dir_all(&file.path)
                } else {
                    // without purge only an empty directory may be removed
                    fs::remove_dir(&file.path)
                };
                match removal {
                    Ok(()) => (Outcome::Applied, Some("removed".to_string())),
                    Err(e) => (Outcome::Failed, Some(e.to_string())),
                }
            }
        }
    }

    fn apply_exec(&self, exec: &ExecResource) -> (Outcome, Option<String>) {
        if exec.creates.exists() {
            return (
                Outcome::Unchanged,
                Some(format!("{} exists", exec.creates.display())),
            );
        }

        if self.dry_run {
            return (Outcome::WouldApply, Some(exec.command.clone()));
        }

        match shell::execute_quiet(&exec.command, None) {
            Ok(result) if result.success => (Outcome::Applied, Some(exec.command.clone())),
            Ok(result) => (
                Outcome::Failed,
                Some(format!(
                    "exit code {:?}: {}",
                    result.exit_code,
                    truncate(result.stderr.trim(), 200)
                )),
            ),
            Err(e) => (Outcome::Failed, Some(e.to_string())),
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn file_present(path: PathBuf) -> Resource {
        Resource::File(FileResource {
            path,
            ensure: Ensure::Present,
            purge: false,
        })
    }

    fn file_absent(path: PathBuf) -> Resource {
        Resource::File(FileResource {
            path,
            ensure: Ensure::Absent,
            purge: true,
        })
    }

    fn exec(command: &str, creates: PathBuf) -> Resource {
        Resource::Exec(ExecResource {
            name: "python_virtualenv_/tmp/env".to_string(),
            command: command.to_string(),
            creates,
        })
    }

    #[test]
    fn file_present_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");

        let summary = Engine::new(false).apply(&[file_present(target.clone())]);

        assert_eq!(summary.results[0].outcome, Outcome::Applied);
        assert!(target.is_dir());
    }

    #[test]
    fn file_present_existing_directory_is_unchanged() {
        let temp = TempDir::new().unwrap();

        let summary = Engine::new(false).apply(&[file_present(temp.path().to_path_buf())]);

        assert_eq!(summary.results[0].outcome, Outcome::Unchanged);
    }

    #[test]
    fn file_present_fails_on_non_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");
        fs::write(&target, "not a dir").unwrap();

        let summary = Engine::new(false).apply(&[file_present(target)]);

        assert_eq!(summary.results[0].outcome, Outcome::Failed);
        assert!(summary.results[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("not a directory"));
    }

    #[test]
    fn file_absent_removes_directory_tree() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");
        fs::create_dir_all(target.join("lib").join("site-packages")).unwrap();
        fs::write(target.join("pyvenv.cfg"), "home = /usr/bin").unwrap();

        let summary = Engine::new(false).apply(&[file_absent(target.clone())]);

        assert_eq!(summary.results[0].outcome, Outcome::Applied);
        assert!(!target.exists());
    }

    #[test]
    fn file_absent_without_purge_refuses_populated_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("pyvenv.cfg"), "home = /usr/bin").unwrap();

        let resource = Resource::File(FileResource {
            path: target.clone(),
            ensure: Ensure::Absent,
            purge: false,
        });
        let summary = Engine::new(false).apply(&[resource]);

        assert_eq!(summary.results[0].outcome, Outcome::Failed);
        assert!(target.exists());
    }

    #[test]
    fn file_absent_missing_is_unchanged() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("gone");

        let summary = Engine::new(false).apply(&[file_absent(target)]);

        assert_eq!(summary.results[0].outcome, Outcome::Unchanged);
    }

    #[test]
    fn exec_runs_when_guard_missing() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("ran.txt");
        let command = format!("echo done > {}", marker.display());

        let summary =
            Engine::new(false).apply(&[exec(&command, temp.path().join("pyvenv.cfg"))]);

        assert_eq!(summary.results[0].outcome, Outcome::Applied);
        assert!(marker.exists());
    }

    #[test]
    fn exec_skips_when_guard_exists() {
        let temp = TempDir::new().unwrap();
        let guard = temp.path().join("pyvenv.cfg");
        fs::write(&guard, "home = /usr/bin").unwrap();

        let summary = Engine::new(false).apply(&[exec("exit 1", guard)]);

        assert_eq!(summary.results[0].outcome, Outcome::Unchanged);
    }

    #[test]
    fn exec_failure_records_exit_code() {
        let temp = TempDir::new().unwrap();

        let summary = Engine::new(false).apply(&[exec("exit 3", temp.path().join("missing"))]);

        assert_eq!(summary.results[0].outcome, Outcome::Failed);
        assert!(summary.results[0].detail.as_deref().unwrap().contains("3"));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");
        let marker = temp.path().join("ran.txt");
        let command = format!("echo done > {}", marker.display());

        let summary = Engine::new(true).apply(&[
            file_present(target.clone()),
            exec(&command, target.join("pyvenv.cfg")),
        ]);

        assert_eq!(summary.results[0].outcome, Outcome::WouldApply);
        assert_eq!(summary.results[1].outcome, Outcome::WouldApply);
        assert!(!target.exists());
        assert!(!marker.exists());
    }

    #[test]
    fn dry_run_reports_removal() {
        let temp = TempDir::new().unwrap();

        let summary = Engine::new(true).apply(&[file_absent(temp.path().to_path_buf())]);

        assert_eq!(summary.results[0].outcome, Outcome::WouldApply);
        assert!(temp.path().exists());
    }

    #[test]
    fn second_apply_is_all_unchanged() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");
        let guard = target.join("pyvenv.cfg");
        let command = format!("echo home > {}", guard.display());

        let resources = [file_present(target.clone()), exec(&command, guard.clone())];

        let engine = Engine::new(false);
        let first = engine.apply(&resources);
        assert_eq!(first.applied(), 2);

        let second = engine.apply(&resources);
        assert_eq!(second.unchanged(), 2);
        assert_eq!(second.applied(), 0);
    }

    #[test]
    fn failure_does_not_abort_remaining_resources() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");

        let summary = Engine::new(false).apply(&[
            exec("exit 1", temp.path().join("missing")),
            file_present(target.clone()),
        ]);

        assert_eq!(summary.results[0].outcome, Outcome::Failed);
        assert_eq!(summary.results[1].outcome, Outcome::Applied);
        assert!(target.is_dir());
        assert!(!summary.success());
    }

    #[test]
    fn summary_counts_outcomes() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("env");

        let mut summary = Engine::new(false).apply(&[
            file_present(target.clone()),
            file_present(target),
        ]);

        assert_eq!(summary.applied(), 1);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(summary.failed(), 0);
        assert!(summary.success());

        summary.push_failure("File[/opt/env]", "python3 is required");
        assert_eq!(summary.failed(), 1);
        assert!(!summary.success());
    }

    #[test]
    fn outcome_display_chars_are_distinct() {
        let chars = [
            Outcome::Applied.display_char(),
            Outcome::Unchanged.display_char(),
            Outcome::WouldApply.display_char(),
            Outcome::Failed.display_char(),
        ];
        let unique: std::collections::HashSet<_> = chars.iter().collect();
        assert_eq!(unique.len(), chars.len());
    }
}
