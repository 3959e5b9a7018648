//! Plan command implementation.
//!
//! `nodebundle plan` constructs the workflow and prints its actions
//! without running them.

use std::path::{Path, PathBuf};

use crate::actions::{Action, BuildAction};
use crate::cli::args::BuildArgs;
use crate::error::Result;
use crate::osutils::{OsUtils, SystemOsUtils};
use crate::ui::UserInterface;
use crate::workflow::Workflow;

use super::dispatcher::{Command, CommandResult};
use super::prepare::{resolve_config, workflow_config, ScratchDir};

/// The plan command implementation.
pub struct PlanCommand {
    args: BuildArgs,
    config_path: Option<PathBuf>,
}

impl PlanCommand {
    pub fn new(args: BuildArgs, config_path: Option<&Path>) -> Self {
        Self {
            args,
            config_path: config_path.map(Path::to_path_buf),
        }
    }

    /// Construct the workflow against the given OS layer and print it.
    ///
    /// Resolving the esbuild search path runs `npm bin` in the scratch
    /// directory, so that directory is still prepared.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        osutils: &dyn OsUtils,
    ) -> Result<CommandResult> {
        let config = resolve_config(&self.args, self.config_path.as_deref())?;
        let scratch = ScratchDir::prepare(self.args.scratch_dir.as_deref())?;
        let workflow = Workflow::new(workflow_config(&self.args, config, &scratch), osutils)?;

        let actions = workflow.actions();
        ui.show_header(&format!(
            "{} · {} actions · {}",
            workflow.name(),
            actions.len(),
            workflow.architecture()
        ));
        for (index, action) in actions.iter().enumerate() {
            ui.message(&format!(
                "{}. {:<15} {}",
                index + 1,
                action.name(),
                action.description()
            ));
        }

        if ui.output_mode().shows_details() {
            let bundle = actions.iter().find_map(|action| match action {
                BuildAction::EsbuildBundle(bundle) => Some(bundle),
                _ => None,
            });
            if let Some(bundle) = bundle {
                for dir in bundle.esbuild().executable_search_paths() {
                    ui.message(&format!("search path: {}", dir.display()));
                }
            }
            for (key, value) in workflow.options() {
                ui.message(&format!("option: {}={}", key, value));
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(ui, &SystemOsUtils::new())
    }
}
