//! Build actions.
//!
//! A workflow is an ordered list of [`BuildAction`]s. Each variant wraps a
//! concrete action implementing the [`Action`] trait, so the runner only
//! ever calls the uniform [`Action::execute`] contract:
//!
//! - [`CopySourceAction`] - copy the project into the scratch directory
//! - [`NpmInstallAction`] - `npm install` (no lockfile)
//! - [`NpmCiAction`] - `npm ci` (lockfile present)
//! - [`EsbuildBundleAction`] - bundle entry points with esbuild

pub mod copy;
pub mod esbuild;
pub mod npm;

pub use copy::CopySourceAction;
pub use esbuild::EsbuildBundleAction;
pub use npm::{NpmCiAction, NpmInstallAction};

use crate::error::Result;
use crate::osutils::OsUtils;

/// Collaborators available to actions at execution time.
pub struct ActionContext<'a> {
    pub osutils: &'a dyn OsUtils,
}

impl<'a> ActionContext<'a> {
    pub fn new(osutils: &'a dyn OsUtils) -> Self {
        Self { osutils }
    }
}

/// A single step of a build.
pub trait Action {
    /// Short, stable name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Human-readable summary of what the action will do.
    fn description(&self) -> String;

    /// Perform the action.
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<()>;
}

/// Every action a workflow can contain.
#[derive(Debug, Clone)]
pub enum BuildAction {
    CopySource(CopySourceAction),
    NpmInstall(NpmInstallAction),
    NpmCi(NpmCiAction),
    EsbuildBundle(EsbuildBundleAction),
}

impl BuildAction {
    fn inner(&self) -> &dyn Action {
        match self {
            Self::CopySource(a) => a,
            Self::NpmInstall(a) => a,
            Self::NpmCi(a) => a,
            Self::EsbuildBundle(a) => a,
        }
    }
}

impl Action for BuildAction {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn description(&self) -> String {
        self.inner().description()
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> Result<()> {
        self.inner().execute(ctx)
    }
}
