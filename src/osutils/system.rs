//! Real filesystem and process adapter.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{NodeBundleError, Result};
use crate::shell::{execute, platform, CommandOptions, CommandResult};

use super::OsUtils;

/// [`OsUtils`] backed by the host filesystem and real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOsUtils;

impl SystemOsUtils {
    pub fn new() -> Self {
        Self
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

fn is_excluded(relative: &Path, excludes: &[&str]) -> bool {
    relative.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|name| excludes.contains(&name))
            .unwrap_or(false)
    })
}

impl OsUtils for SystemOsUtils {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn parse_json(&self, path: &Path) -> Result<serde_json::Value> {
        let content = fs::read_to_string(path).map_err(|e| NodeBundleError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| NodeBundleError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn run_process(&self, args: &[String], cwd: &Path) -> Result<CommandResult> {
        let options = CommandOptions {
            cwd: Some(cwd.to_path_buf()),
        };
        execute(args, &options)
    }

    fn is_windows(&self) -> bool {
        platform::is_windows()
    }

    fn copy_tree(&self, source: &Path, dest: &Path, excludes: &[&str]) -> Result<()> {
        fs::create_dir_all(dest)?;

        // A destination nested in the source must not be walked into.
        let nested_dest = match (fs::canonicalize(source), fs::canonicalize(dest)) {
            (Ok(source), Ok(dest)) if dest.starts_with(&source) => Some(dest),
            _ => None,
        };

        let walker = WalkDir::new(source).min_depth(1).into_iter();
        for entry in walker.filter_entry(|e| {
            if let Some(nested) = &nested_dest {
                let is_dest = e.file_type().is_dir()
                    && fs::canonicalize(e.path()).is_ok_and(|p| &p == nested);
                if is_dest {
                    return false;
                }
            }
            e.path()
                .strip_prefix(source)
                .map(|rel| !is_excluded(rel, excludes))
                .unwrap_or(true)
        }) {
            let entry = entry.map_err(|e| anyhow::anyhow!(e))?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| anyhow::anyhow!(e))?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
            }
        }

        debug!("Copied {} to {}", source.display(), dest.display());
        Ok(())
    }

    fn find_executable(&self, names: &[&str], search_paths: &[PathBuf]) -> Option<PathBuf> {
        for dir in search_paths {
            for name in names {
                let candidate = dir.join(name);
                if candidate.is_file() && is_executable(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}
