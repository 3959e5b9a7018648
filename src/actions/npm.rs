//! Dependency installation with npm.

use std::path::{Path, PathBuf};

use crate::error::{NodeBundleError, Result};
use crate::tools::npm;

use super::{Action, ActionContext};

/// Arguments for a non-lockfile install. Dev dependencies are kept because
/// the bundler usually needs them.
const INSTALL_ARGS: &[&str] = &[
    "install",
    "-q",
    "--no-audit",
    "--no-save",
    "--production=false",
    "--unsafe-perm",
];

const CI_ARGS: &[&str] = &["ci"];

fn run_install(ctx: &ActionContext<'_>, args: &[&str], dir: &Path) -> Result<()> {
    npm::run(ctx.osutils, args, dir)
        .map(|_| ())
        .map_err(|e| match e {
            NodeBundleError::NpmExecution { message, .. } => {
                NodeBundleError::InstallFailed { message }
            }
            other => other,
        })
}

/// `npm install`: resolves versions and may write a new lockfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmInstallAction {
    install_dir: PathBuf,
}

impl NpmInstallAction {
    pub fn new(install_dir: PathBuf) -> Self {
        Self { install_dir }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }
}

impl Action for NpmInstallAction {
    fn name(&self) -> &'static str {
        "npm-install"
    }

    fn description(&self) -> String {
        format!("npm install in {}", self.install_dir.display())
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> Result<()> {
        run_install(ctx, INSTALL_ARGS, &self.install_dir)
    }
}

/// `npm ci`: installs exactly what the lockfile pins and fails if it
/// disagrees with the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmCiAction {
    install_dir: PathBuf,
}

impl NpmCiAction {
    pub fn new(install_dir: PathBuf) -> Self {
        Self { install_dir }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }
}

impl Action for NpmCiAction {
    fn name(&self) -> &'static str {
        "npm-ci"
    }

    fn description(&self) -> String {
        format!("npm ci in {}", self.install_dir.display())
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> Result<()> {
        run_install(ctx, CI_ARGS, &self.install_dir)
    }
}
