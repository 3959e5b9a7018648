//! Build workflow construction and execution.
//!
//! [`Workflow::new`] inspects the project (manifest and lockfiles) and
//! assembles an ordered list of [`BuildAction`]s without mutating the
//! filesystem. [`Workflow::run`] then executes the actions in order and
//! stops at the first failure.
//!
//! # Example
//!
//! ```
//! use nodebundle::osutils::MockOsUtils;
//! use nodebundle::workflow::{Workflow, WorkflowConfig, EXPERIMENTAL_FLAG_ESBUILD};
//! use serde_json::json;
//!
//! let os = MockOsUtils::new()
//!     .with_json("manifest", json!({"aws_sam": {"bundler": "esbuild"}}))
//!     .queue_output("project/bin");
//!
//! let config = WorkflowConfig::new("source", "artifacts", "scratch_dir", "manifest")
//!     .with_experimental_flags(vec![EXPERIMENTAL_FLAG_ESBUILD.to_string()]);
//! let workflow = Workflow::new(config, &os).unwrap();
//!
//! assert_eq!(workflow.actions().len(), 3);
//! assert_eq!(workflow.architecture(), "x86_64");
//! ```

pub mod search_path;

pub use search_path::resolve_esbuild_search_paths;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::actions::{
    Action, ActionContext, BuildAction, CopySourceAction, EsbuildBundleAction, NpmCiAction,
    NpmInstallAction,
};
use crate::architecture::Architecture;
use crate::error::{NodeBundleError, Result};
use crate::manifest::{Bundler, Manifest};
use crate::osutils::OsUtils;
use crate::tools::SubprocessEsbuild;

/// Name reported in workflow failures.
pub const WORKFLOW_NAME: &str = "npm-esbuild";

/// Experimental flag that enables the esbuild bundling step.
pub const EXPERIMENTAL_FLAG_ESBUILD: &str = "experimentalEsbuild";

const LOCKFILE: &str = "package-lock.json";
const SHRINKWRAP: &str = "npm-shrinkwrap.json";

/// Inputs for building a [`Workflow`].
#[derive(Debug, Clone, Default)]
pub struct WorkflowConfig {
    pub source_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Free-form options passed through to the build.
    pub options: BTreeMap<String, String>,
    /// Architecture name; validated by [`Workflow::new`]. Defaults to x86_64.
    pub architecture: Option<String>,
    /// Extra directories searched for executables, after npm's bin dir.
    pub executable_search_paths: Vec<PathBuf>,
    pub experimental_flags: Vec<String>,
}

impl WorkflowConfig {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        artifacts_dir: impl Into<PathBuf>,
        scratch_dir: impl Into<PathBuf>,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            artifacts_dir: artifacts_dir.into(),
            scratch_dir: scratch_dir.into(),
            manifest_path: manifest_path.into(),
            ..Default::default()
        }
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = Some(architecture.into());
        self
    }

    pub fn with_executable_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.executable_search_paths = paths;
        self
    }

    pub fn with_experimental_flags(mut self, flags: Vec<String>) -> Self {
        self.experimental_flags = flags;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    fn has_flag(&self, flag: &str) -> bool {
        self.experimental_flags.iter().any(|f| f == flag)
    }
}

/// Progress events emitted during workflow execution.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// An action is about to start.
    ActionStarting {
        name: &'a str,
        description: String,
        index: usize,
        total: usize,
    },
    /// An action finished successfully.
    ActionFinished { name: &'a str, duration: Duration },
    /// An action failed; no further actions will run.
    ActionFailed { name: &'a str, error: String },
}

/// Outcome of one executed action.
#[derive(Debug, Clone)]
pub struct ActionResult {
    pub name: String,
    pub duration: Duration,
}

/// Result of a successful workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowResult {
    pub workflow: String,
    pub actions: Vec<ActionResult>,
    pub duration: Duration,
}

/// A fully constructed build.
#[derive(Debug, Clone)]
pub struct Workflow {
    source_dir: PathBuf,
    artifacts_dir: PathBuf,
    scratch_dir: PathBuf,
    manifest_path: PathBuf,
    options: BTreeMap<String, String>,
    architecture: Architecture,
    experimental_flags: Vec<String>,
    actions: Vec<BuildAction>,
}

impl Workflow {
    /// Inspect the project and assemble the action list.
    ///
    /// Reads the manifest, probes for lockfiles and, when bundling is
    /// requested, runs `npm bin` to resolve the esbuild search path. Nothing
    /// is written to disk.
    pub fn new(config: WorkflowConfig, osutils: &dyn OsUtils) -> Result<Self> {
        let architecture = match &config.architecture {
            Some(name) => name.parse::<Architecture>()?,
            None => Architecture::default(),
        };

        let manifest = Manifest::load(osutils, &config.manifest_path)?;
        let bundle = Self::should_bundle(&manifest, &config);

        let mut actions = vec![BuildAction::CopySource(CopySourceAction::new(
            config.source_dir.clone(),
            config.scratch_dir.clone(),
        ))];

        actions.push(Self::install_action(&config, osutils));

        if bundle {
            let search_paths = resolve_esbuild_search_paths(
                osutils,
                &config.scratch_dir,
                &config.executable_search_paths,
            )?;
            actions.push(BuildAction::EsbuildBundle(EsbuildBundleAction::new(
                config.scratch_dir.clone(),
                config.artifacts_dir.clone(),
                manifest.bundler_config(),
                SubprocessEsbuild::new(search_paths),
            )));
        }

        debug!(
            "Workflow actions: {:?}",
            actions.iter().map(|a| a.name()).collect::<Vec<_>>()
        );

        Ok(Self {
            source_dir: config.source_dir,
            artifacts_dir: config.artifacts_dir,
            scratch_dir: config.scratch_dir,
            manifest_path: config.manifest_path,
            options: config.options,
            architecture,
            experimental_flags: config.experimental_flags,
            actions,
        })
    }

    fn should_bundle(manifest: &Manifest, config: &WorkflowConfig) -> bool {
        match manifest.bundler() {
            Some(Bundler::Esbuild) if config.has_flag(EXPERIMENTAL_FLAG_ESBUILD) => true,
            Some(bundler) => {
                debug!(
                    "Manifest requests {} but the {} flag is not set; skipping bundling",
                    bundler.as_str(),
                    EXPERIMENTAL_FLAG_ESBUILD
                );
                false
            }
            None => {
                debug!("No bundler requested in {}", manifest.path().display());
                false
            }
        }
    }

    /// `npm ci` when a lockfile or shrinkwrap exists, `npm install` otherwise.
    ///
    /// The shrinkwrap probe only happens when there is no lockfile.
    fn install_action(config: &WorkflowConfig, osutils: &dyn OsUtils) -> BuildAction {
        let lockfile = osutils.join_path(&config.source_dir, LOCKFILE);
        let shrinkwrap = osutils.join_path(&config.source_dir, SHRINKWRAP);

        if osutils.file_exists(&lockfile) || osutils.file_exists(&shrinkwrap) {
            BuildAction::NpmCi(NpmCiAction::new(config.scratch_dir.clone()))
        } else {
            BuildAction::NpmInstall(NpmInstallAction::new(config.scratch_dir.clone()))
        }
    }

    pub fn name(&self) -> &'static str {
        WORKFLOW_NAME
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn experimental_flags(&self) -> &[String] {
        &self.experimental_flags
    }

    /// Actions in execution order.
    pub fn actions(&self) -> &[BuildAction] {
        &self.actions
    }

    /// Run every action in order.
    pub fn run(&self, osutils: &dyn OsUtils) -> Result<WorkflowResult> {
        self.run_with_progress(osutils, |_| {})
    }

    /// Run every action in order, reporting progress.
    ///
    /// The first failing action aborts the run with
    /// [`NodeBundleError::WorkflowFailed`].
    pub fn run_with_progress<F>(
        &self,
        osutils: &dyn OsUtils,
        mut on_progress: F,
    ) -> Result<WorkflowResult>
    where
        F: FnMut(RunProgress<'_>),
    {
        let start = Instant::now();
        let ctx = ActionContext::new(osutils);
        let total = self.actions.len();
        let mut results = Vec::with_capacity(total);

        info!("Running workflow '{}' ({} actions)", WORKFLOW_NAME, total);

        for (index, action) in self.actions.iter().enumerate() {
            let name = action.name();
            info!("Running {}:{}", WORKFLOW_NAME, name);
            on_progress(RunProgress::ActionStarting {
                name,
                description: action.description(),
                index,
                total,
            });

            let action_start = Instant::now();
            if let Err(e) = action.execute(&ctx) {
                let reason = e.to_string();
                on_progress(RunProgress::ActionFailed {
                    name,
                    error: reason.clone(),
                });
                return Err(NodeBundleError::WorkflowFailed {
                    workflow: WORKFLOW_NAME.to_string(),
                    action: name.to_string(),
                    reason,
                });
            }

            let duration = action_start.elapsed();
            on_progress(RunProgress::ActionFinished { name, duration });
            results.push(ActionResult {
                name: name.to_string(),
                duration,
            });
        }

        Ok(WorkflowResult {
            workflow: WORKFLOW_NAME.to_string(),
            actions: results,
            duration: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osutils::MockOsUtils;
    use serde_json::json;

    fn bundling_os() -> MockOsUtils {
        MockOsUtils::new().with_json("manifest", json!({"aws_sam": {"bundler": "esbuild"}}))
    }

    fn config() -> WorkflowConfig {
        WorkflowConfig::new("source", "artifacts", "scratch_dir", "manifest")
            .with_experimental_flags(vec![EXPERIMENTAL_FLAG_ESBUILD.to_string()])
    }

    fn probes(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn sets_up_npm_install_and_bundler_without_lockfile() {
        let os = bundling_os()
            .queue_file_exists(vec![true, false, false])
            .queue_output("project/bin");

        let workflow = Workflow::new(config(), &os).unwrap();

        let actions = workflow.actions();
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[0], BuildAction::CopySource(_)));
        assert!(matches!(actions[1], BuildAction::NpmInstall(_)));
        assert!(matches!(actions[2], BuildAction::EsbuildBundle(_)));
        assert_eq!(
            os.file_exists_calls(),
            probes(&[
                "manifest",
                "source/package-lock.json",
                "source/npm-shrinkwrap.json"
            ])
        );
    }

    #[test]
    fn uses_npm_ci_if_lockfile_exists() {
        let os = bundling_os()
            .queue_file_exists(vec![true, true])
            .queue_output("project/bin");

        let workflow = Workflow::new(config(), &os).unwrap();

        let actions = workflow.actions();
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[1], BuildAction::NpmCi(_)));
        assert_eq!(
            os.file_exists_calls(),
            probes(&["manifest", "source/package-lock.json"])
        );
    }

    #[test]
    fn uses_npm_ci_if_shrinkwrap_exists() {
        let os = bundling_os()
            .queue_file_exists(vec![true, false, true])
            .queue_output("project/bin");

        let workflow = Workflow::new(config(), &os).unwrap();

        assert!(matches!(workflow.actions()[1], BuildAction::NpmCi(_)));
        assert_eq!(
            os.file_exists_calls(),
            probes(&[
                "manifest",
                "source/package-lock.json",
                "source/npm-shrinkwrap.json"
            ])
        );
    }

    #[test]
    fn sets_up_esbuild_search_path_from_npm_bin() {
        let os = bundling_os().queue_output("project/bin");

        let workflow = Workflow::new(config(), &os).unwrap();

        let calls = os.process_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["npm".to_string(), "bin".to_string()]);
        assert_eq!(calls[0].cwd, PathBuf::from("scratch_dir"));

        match &workflow.actions()[2] {
            BuildAction::EsbuildBundle(bundle) => assert_eq!(
                bundle.esbuild().executable_search_paths(),
                &[PathBuf::from("project/bin")]
            ),
            other => panic!("expected bundle action, got {other:?}"),
        }
    }

    #[test]
    fn workflow_search_paths_come_after_npm_bin() {
        let os = bundling_os().queue_output("project/bin");
        let config = config().with_executable_search_paths(vec![PathBuf::from("other/bin")]);

        let workflow = Workflow::new(config, &os).unwrap();

        match &workflow.actions()[2] {
            BuildAction::EsbuildBundle(bundle) => assert_eq!(
                bundle.esbuild().executable_search_paths(),
                &[PathBuf::from("project/bin"), PathBuf::from("other/bin")]
            ),
            other => panic!("expected bundle action, got {other:?}"),
        }
    }

    #[test]
    fn validates_architecture() {
        let os = bundling_os().queue_output("bin").queue_output("bin");

        let workflow = Workflow::new(
            WorkflowConfig::new("source", "artifacts", "scratch", "manifest")
                .with_option("artifact_executable_name", "foo")
                .with_experimental_flags(vec![EXPERIMENTAL_FLAG_ESBUILD.to_string()]),
            &os,
        )
        .unwrap();
        let workflow_with_arm = Workflow::new(
            WorkflowConfig::new("source", "artifacts", "scratch", "manifest")
                .with_architecture("arm64")
                .with_experimental_flags(vec![EXPERIMENTAL_FLAG_ESBUILD.to_string()]),
            &os,
        )
        .unwrap();

        assert_eq!(workflow.architecture(), "x86_64");
        assert_eq!(workflow_with_arm.architecture(), "arm64");
        assert_eq!(
            workflow.options().get("artifact_executable_name").map(String::as_str),
            Some("foo")
        );
    }

    #[test]
    fn unsupported_architecture_fails_before_probing() {
        let os = bundling_os();

        let err = Workflow::new(config().with_architecture("ppc64le"), &os).unwrap_err();

        assert!(matches!(err, NodeBundleError::UnsupportedArchitecture { .. }));
        assert!(os.file_exists_calls().is_empty());
        assert!(os.process_calls().is_empty());
    }

    #[test]
    fn missing_manifest_fails_construction() {
        let os = MockOsUtils::new();

        let err = Workflow::new(config(), &os).unwrap_err();

        assert!(matches!(err, NodeBundleError::ManifestParse { .. }));
    }

    #[test]
    fn skips_bundling_without_experimental_flag() {
        let os = bundling_os();

        let workflow = Workflow::new(
            WorkflowConfig::new("source", "artifacts", "scratch_dir", "manifest"),
            &os,
        )
        .unwrap();

        assert_eq!(workflow.actions().len(), 2);
        assert!(matches!(workflow.actions()[1], BuildAction::NpmInstall(_)));
        assert!(os.process_calls().is_empty());
    }

    #[test]
    fn skips_bundling_when_manifest_does_not_request_it() {
        let os = MockOsUtils::new().with_json("manifest", json!({"name": "app"}));

        let workflow = Workflow::new(config(), &os).unwrap();

        assert_eq!(workflow.actions().len(), 2);
        assert!(os.process_calls().is_empty());
    }

    #[test]
    fn npm_bin_failure_fails_construction() {
        let os = bundling_os().queue_failure(1, "npm ERR! Unknown command");

        let err = Workflow::new(config(), &os).unwrap_err();

        assert!(matches!(err, NodeBundleError::NpmExecution { .. }));
    }

    #[test]
    fn construction_is_repeatable() {
        let os = bundling_os()
            .queue_file_exists(vec![true, true, true, true])
            .queue_output("project/bin")
            .queue_output("project/bin");

        let first = Workflow::new(config(), &os).unwrap();
        let second = Workflow::new(config(), &os).unwrap();

        let names = |w: &Workflow| w.actions().iter().map(|a| a.name()).collect::<Vec<_>>();
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), vec!["copy-source", "npm-ci", "esbuild-bundle"]);
    }

    #[test]
    fn run_executes_actions_in_order() {
        let os = MockOsUtils::new()
            .with_json(
                "manifest",
                json!({"aws_sam": {"bundler": "esbuild", "entry_points": ["app.js"]}}),
            )
            .with_file("scratch_dir/app.js")
            .with_executable("project/bin/esbuild")
            .queue_output("project/bin");
        let workflow = Workflow::new(config(), &os).unwrap();

        let mut started = Vec::new();
        let result = workflow
            .run_with_progress(&os, |event| {
                if let RunProgress::ActionStarting { name, .. } = event {
                    started.push(name.to_string());
                }
            })
            .unwrap();

        assert_eq!(started, vec!["copy-source", "npm-install", "esbuild-bundle"]);
        assert_eq!(result.actions.len(), 3);
        assert_eq!(os.copy_calls().len(), 1);

        let programs: Vec<_> = os
            .process_calls()
            .iter()
            .map(|c| c.args[..2].join(" "))
            .collect();
        assert_eq!(
            programs,
            vec!["npm bin", "npm install", "project/bin/esbuild scratch_dir/app.js"]
        );
    }

    #[test]
    fn run_stops_at_first_failure() {
        let os = bundling_os()
            .with_file("source/package-lock.json")
            .queue_output("project/bin")
            .queue_failure(1, "npm ERR! lockfile mismatch");
        let workflow = Workflow::new(config(), &os).unwrap();

        let err = workflow.run(&os).unwrap_err();

        match err {
            NodeBundleError::WorkflowFailed {
                workflow,
                action,
                reason,
            } => {
                assert_eq!(workflow, "npm-esbuild");
                assert_eq!(action, "npm-ci");
                assert!(reason.contains("lockfile mismatch"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // npm bin + npm ci; esbuild never ran
        assert_eq!(os.process_calls().len(), 2);
    }
}
