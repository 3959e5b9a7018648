//! Shared setup for `build` and `plan`.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::cli::args::BuildArgs;
use crate::config::{load_config, BuildConfig};
use crate::error::Result;
use crate::workflow::WorkflowConfig;

/// Scratch directory for one invocation.
///
/// A temporary directory is removed when this value is dropped.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    _temp: Option<TempDir>,
}

impl ScratchDir {
    /// Use `requested` (created if missing) or a fresh temporary directory.
    pub fn prepare(requested: Option<&Path>) -> Result<Self> {
        match requested {
            Some(path) => {
                fs::create_dir_all(path)?;
                Ok(Self {
                    path: path.to_path_buf(),
                    _temp: None,
                })
            }
            None => {
                let temp = tempfile::Builder::new().prefix("nodebundle-").tempdir()?;
                tracing::debug!("Using temporary scratch dir {}", temp.path().display());
                Ok(Self {
                    path: temp.path().to_path_buf(),
                    _temp: Some(temp),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Load the config file and apply command-line overrides.
pub fn resolve_config(args: &BuildArgs, config_path: Option<&Path>) -> Result<BuildConfig> {
    let mut config = load_config(config_path, &args.source_dir)?;
    config.merge(args.overrides());
    config.validate()?;
    Ok(config)
}

/// Assemble workflow inputs from arguments, config and scratch dir.
pub fn workflow_config(
    args: &BuildArgs,
    config: BuildConfig,
    scratch: &ScratchDir,
) -> WorkflowConfig {
    WorkflowConfig {
        source_dir: args.source_dir.clone(),
        artifacts_dir: args.artifacts_dir.clone(),
        scratch_dir: scratch.path().to_path_buf(),
        manifest_path: args.manifest_path(),
        options: config.options,
        architecture: config.architecture,
        executable_search_paths: config.executable_search_paths,
        experimental_flags: config.experimental_flags,
    }
}
