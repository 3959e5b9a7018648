//! Scripted [`OsUtils`] implementation for testing.
//!
//! `MockOsUtils` never touches the disk or spawns processes. File probes,
//! manifest contents and process output are configured up front and every
//! call is recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use std::path::{Path, PathBuf};
//! use nodebundle::osutils::{MockOsUtils, OsUtils};
//!
//! let os = MockOsUtils::new().with_file("source/package-lock.json");
//!
//! assert!(os.file_exists(Path::new("source/package-lock.json")));
//! assert!(!os.file_exists(Path::new("source/npm-shrinkwrap.json")));
//! assert_eq!(
//!     os.file_exists_calls(),
//!     vec![
//!         PathBuf::from("source/package-lock.json"),
//!         PathBuf::from("source/npm-shrinkwrap.json"),
//!     ]
//! );
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{NodeBundleError, Result};
use crate::shell::CommandResult;

use super::OsUtils;

/// A recorded `run_process` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCall {
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// A recorded `copy_tree` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCall {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub excludes: Vec<String>,
}

/// Scripted OS utilities.
///
/// `file_exists` answers from the queued responses first (in call order)
/// and falls back to the configured file set. `run_process` pops queued
/// results and returns an empty success once the queue is exhausted.
#[derive(Debug, Default)]
pub struct MockOsUtils {
    windows: bool,
    files: HashSet<PathBuf>,
    executables: HashSet<PathBuf>,
    json: HashMap<PathBuf, serde_json::Value>,
    exists_queue: RefCell<VecDeque<bool>>,
    process_queue: RefCell<VecDeque<CommandResult>>,
    exists_calls: RefCell<Vec<PathBuf>>,
    process_calls: RefCell<Vec<ProcessCall>>,
    copy_calls: RefCell<Vec<CopyCall>>,
    json_calls: RefCell<Vec<PathBuf>>,
}

impl MockOsUtils {
    /// Create an empty mock for a non-Windows host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the host is (or is not) Windows.
    pub fn with_windows(mut self, windows: bool) -> Self {
        self.windows = windows;
        self
    }

    /// Mark a file as existing.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.insert(path.as_ref().to_path_buf());
        self
    }

    /// Register JSON content for a path; the path also counts as existing.
    pub fn with_json(mut self, path: impl AsRef<Path>, value: serde_json::Value) -> Self {
        let path = path.as_ref().to_path_buf();
        self.files.insert(path.clone());
        self.json.insert(path, value);
        self
    }

    /// Mark a path as an executable file.
    pub fn with_executable(mut self, path: impl AsRef<Path>) -> Self {
        self.executables.insert(path.as_ref().to_path_buf());
        self
    }

    /// Queue answers for the next `file_exists` calls, in order.
    pub fn queue_file_exists(self, answers: Vec<bool>) -> Self {
        self.exists_queue.borrow_mut().extend(answers);
        self
    }

    /// Queue a successful process result with the given stdout.
    pub fn queue_output(self, stdout: &str) -> Self {
        self.queue_process(CommandResult::success(
            stdout.to_string(),
            String::new(),
            Duration::ZERO,
        ))
    }

    /// Queue a failed process result with the given exit code and stderr.
    pub fn queue_failure(self, exit_code: i32, stderr: &str) -> Self {
        self.queue_process(CommandResult::failure(
            Some(exit_code),
            String::new(),
            stderr.to_string(),
            Duration::ZERO,
        ))
    }

    /// Queue an arbitrary process result.
    pub fn queue_process(self, result: CommandResult) -> Self {
        self.process_queue.borrow_mut().push_back(result);
        self
    }

    /// Paths probed with `file_exists`, in call order.
    pub fn file_exists_calls(&self) -> Vec<PathBuf> {
        self.exists_calls.borrow().clone()
    }

    /// Processes run, in call order.
    pub fn process_calls(&self) -> Vec<ProcessCall> {
        self.process_calls.borrow().clone()
    }

    /// Tree copies performed, in call order.
    pub fn copy_calls(&self) -> Vec<CopyCall> {
        self.copy_calls.borrow().clone()
    }

    /// Paths parsed as JSON, in call order.
    pub fn parse_json_calls(&self) -> Vec<PathBuf> {
        self.json_calls.borrow().clone()
    }
}

impl OsUtils for MockOsUtils {
    fn file_exists(&self, path: &Path) -> bool {
        self.exists_calls.borrow_mut().push(path.to_path_buf());
        match self.exists_queue.borrow_mut().pop_front() {
            Some(answer) => answer,
            None => self.files.contains(path),
        }
    }

    fn parse_json(&self, path: &Path) -> Result<serde_json::Value> {
        self.json_calls.borrow_mut().push(path.to_path_buf());
        self.json
            .get(path)
            .cloned()
            .ok_or_else(|| NodeBundleError::ManifestParse {
                path: path.to_path_buf(),
                message: "no such file".to_string(),
            })
    }

    fn run_process(&self, args: &[String], cwd: &Path) -> Result<CommandResult> {
        self.process_calls.borrow_mut().push(ProcessCall {
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });
        Ok(self
            .process_queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                CommandResult::success(String::new(), String::new(), Duration::ZERO)
            }))
    }

    fn is_windows(&self) -> bool {
        self.windows
    }

    fn copy_tree(&self, source: &Path, dest: &Path, excludes: &[&str]) -> Result<()> {
        self.copy_calls.borrow_mut().push(CopyCall {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            excludes: excludes.iter().map(|s| s.to_string()).collect(),
        });
        Ok(())
    }

    fn find_executable(&self, names: &[&str], search_paths: &[PathBuf]) -> Option<PathBuf> {
        search_paths
            .iter()
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .find(|candidate| self.executables.contains(candidate))
    }
}
