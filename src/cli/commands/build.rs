//! Build command implementation.
//!
//! `nodebundle build` copies the project into a scratch directory, installs
//! its dependencies and, when requested, bundles it with esbuild.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::BuildArgs;
use crate::error::{NodeBundleError, Result};
use crate::osutils::{OsUtils, SystemOsUtils};
use crate::ui::{format_duration, SpinnerHandle, UserInterface};
use crate::workflow::{RunProgress, Workflow};

use super::dispatcher::{Command, CommandResult};
use super::prepare::{resolve_config, workflow_config, ScratchDir};

/// The build command implementation.
pub struct BuildCommand {
    args: BuildArgs,
    config_path: Option<PathBuf>,
}

impl BuildCommand {
    /// Create a new build command.
    pub fn new(args: BuildArgs, config_path: Option<&Path>) -> Self {
        Self {
            args,
            config_path: config_path.map(Path::to_path_buf),
        }
    }

    /// Run the build against the given OS layer.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        osutils: &dyn OsUtils,
    ) -> Result<CommandResult> {
        let config = resolve_config(&self.args, self.config_path.as_deref())?;
        let scratch = ScratchDir::prepare(self.args.scratch_dir.as_deref())?;
        let workflow = Workflow::new(workflow_config(&self.args, config, &scratch), osutils)?;
        fs::create_dir_all(&self.args.artifacts_dir)?;

        ui.show_header(&format!(
            "nodebundle · {} · {} actions · {}",
            workflow.name(),
            workflow.actions().len(),
            workflow.architecture()
        ));
        if ui.output_mode().shows_details() {
            ui.message(&format!("  scratch:   {}", workflow.scratch_dir().display()));
            ui.message(&format!("  artifacts: {}", workflow.artifacts_dir().display()));
        }

        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;
        let result = workflow.run_with_progress(osutils, |event| match event {
            RunProgress::ActionStarting {
                name,
                description,
                index,
                total,
            } => {
                if ui.output_mode().shows_details() {
                    ui.message(&format!("  {}", description));
                }
                spinner = Some(ui.start_spinner(&format!("[{}/{}] {}", index + 1, total, name)));
            }
            RunProgress::ActionFinished { name, duration } => {
                if let Some(mut s) = spinner.take() {
                    s.finish_success(&format!("{} ({})", name, format_duration(duration)));
                }
            }
            RunProgress::ActionFailed { name, error } => {
                if let Some(mut s) = spinner.take() {
                    s.finish_error(&format!("{}: {}", name, error));
                }
            }
        });

        match result {
            Ok(result) => {
                ui.success(&format!(
                    "Build complete in {} → {}",
                    format_duration(result.duration),
                    workflow.artifacts_dir().display()
                ));
                Ok(CommandResult::success())
            }
            Err(e @ NodeBundleError::WorkflowFailed { .. }) => {
                ui.error(&format!("Build failed: {}", e));
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
    }
}

impl Command for BuildCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(ui, &SystemOsUtils::new())
    }
}
