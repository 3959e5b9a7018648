//! Operating system capabilities used by the build workflow.
//!
//! Everything the workflow needs from the outside world (file probes,
//! manifest parsing, subprocesses, platform checks, copying and executable
//! lookup) goes through the [`OsUtils`] trait so that workflow wiring can be
//! tested with a scripted implementation.
//!
//! - [`SystemOsUtils`] - real filesystem and process adapter
//! - [`MockOsUtils`] - scripted adapter that records every call

pub mod mock;
pub mod system;

pub use mock::MockOsUtils;
pub use system::SystemOsUtils;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::shell::CommandResult;

/// Capability provider for filesystem, process and platform access.
pub trait OsUtils {
    /// Check whether a file exists.
    fn file_exists(&self, path: &Path) -> bool;

    /// Read and parse a JSON document.
    fn parse_json(&self, path: &Path) -> Result<serde_json::Value>;

    /// Run a program with piped output in the given working directory.
    fn run_process(&self, args: &[String], cwd: &Path) -> Result<CommandResult>;

    /// Whether the host is Windows.
    fn is_windows(&self) -> bool;

    /// Join a child path onto a base path.
    fn join_path(&self, base: &Path, child: &str) -> PathBuf {
        base.join(child)
    }

    /// Recursively copy `source` into `dest`, skipping excluded names.
    fn copy_tree(&self, source: &Path, dest: &Path, excludes: &[&str]) -> Result<()>;

    /// Find the first executable matching any of `names`.
    ///
    /// Directories are searched in order; within a directory names are tried
    /// in order.
    fn find_executable(&self, names: &[&str], search_paths: &[PathBuf]) -> Option<PathBuf>;
}
