//! esbuild invocation.

use std::path::{Path, PathBuf};

use crate::error::{NodeBundleError, Result};
use crate::osutils::OsUtils;

/// Runs the esbuild binary found on an ordered search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessEsbuild {
    executable_search_paths: Vec<PathBuf>,
}

impl SubprocessEsbuild {
    /// Create an invoker searching `executable_search_paths` in order.
    pub fn new(executable_search_paths: Vec<PathBuf>) -> Self {
        Self {
            executable_search_paths,
        }
    }

    /// Directories searched for the binary, highest precedence first.
    pub fn executable_search_paths(&self) -> &[PathBuf] {
        &self.executable_search_paths
    }

    /// Locate the esbuild binary.
    pub fn binary(&self, osutils: &dyn OsUtils) -> Result<PathBuf> {
        let names: &[&str] = if osutils.is_windows() {
            &["esbuild.cmd", "esbuild.exe"]
        } else {
            &["esbuild"]
        };

        osutils
            .find_executable(names, &self.executable_search_paths)
            .ok_or_else(|| NodeBundleError::EsbuildNotFound {
                search_paths: self
                    .executable_search_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Run esbuild with `args` in `cwd` and return its trimmed stdout.
    pub fn run(&self, osutils: &dyn OsUtils, args: &[String], cwd: &Path) -> Result<String> {
        let binary = self.binary(osutils)?;

        let mut invocation = vec![binary.display().to_string()];
        invocation.extend(args.iter().cloned());

        tracing::debug!("Running esbuild {} in {}", args.join(" "), cwd.display());

        let result = osutils.run_process(&invocation, cwd)?;
        if !result.success {
            return Err(NodeBundleError::BundleFailed {
                message: result.stderr.trim().to_string(),
            });
        }

        Ok(result.stdout.trim().to_string())
    }
}
