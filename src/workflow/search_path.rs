//! Executable search path for the bundler.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{NodeBundleError, Result};
use crate::osutils::OsUtils;
use crate::tools::npm;

/// Resolve where to look for esbuild.
///
/// The first entry is npm's local bin directory for `scratch_dir` (the
/// trimmed output of `npm bin`), followed by `overrides` in the order
/// given. Spawns exactly one process. A failing or silent `npm bin` is an
/// error; there is no fallback.
pub fn resolve_esbuild_search_paths(
    osutils: &dyn OsUtils,
    scratch_dir: &Path,
    overrides: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let npm_bin = npm::run(osutils, &["bin"], scratch_dir)?;
    if npm_bin.is_empty() {
        return Err(NodeBundleError::EmptyBinPath {
            cwd: scratch_dir.to_path_buf(),
        });
    }

    let mut paths = Vec::with_capacity(overrides.len() + 1);
    paths.push(PathBuf::from(npm_bin));
    paths.extend(overrides.iter().cloned());

    debug!("esbuild search paths: {:?}", paths);
    Ok(paths)
}
