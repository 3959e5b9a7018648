//! Bundle entry points with esbuild.

use std::path::{Path, PathBuf};

use crate::error::{NodeBundleError, Result};
use crate::manifest::BundlerConfig;
use crate::tools::SubprocessEsbuild;

use super::{Action, ActionContext};

#[derive(Debug, Clone, PartialEq)]
pub struct EsbuildBundleAction {
    scratch_dir: PathBuf,
    artifacts_dir: PathBuf,
    bundler_config: BundlerConfig,
    esbuild: SubprocessEsbuild,
}

impl EsbuildBundleAction {
    pub fn new(
        scratch_dir: PathBuf,
        artifacts_dir: PathBuf,
        bundler_config: BundlerConfig,
        esbuild: SubprocessEsbuild,
    ) -> Self {
        Self {
            scratch_dir,
            artifacts_dir,
            bundler_config,
            esbuild,
        }
    }

    /// The esbuild invoker, including its resolved search path.
    pub fn esbuild(&self) -> &SubprocessEsbuild {
        &self.esbuild
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn bundler_config(&self) -> &BundlerConfig {
        &self.bundler_config
    }

    /// Validate the bundler configuration and build esbuild's arguments.
    ///
    /// Every entry point must exist in the scratch directory.
    pub fn build_args(&self, ctx: &ActionContext<'_>) -> Result<Vec<String>> {
        let mut args = Vec::new();

        for entry in self.bundler_config.entry_points()? {
            let entry_path = ctx.osutils.join_path(&self.scratch_dir, &entry);
            if !ctx.osutils.file_exists(&entry_path) {
                return Err(NodeBundleError::BundleFailed {
                    message: format!("entry point {} does not exist", entry_path.display()),
                });
            }
            args.push(entry_path.display().to_string());
        }

        args.extend(
            ["--bundle", "--platform=node", "--format=cjs"]
                .iter()
                .map(|s| s.to_string()),
        );
        if self.bundler_config.minify()? {
            args.push("--minify".to_string());
        }
        if self.bundler_config.sourcemap()? {
            args.push("--sourcemap".to_string());
        }
        args.push(format!("--target={}", self.bundler_config.target()?));
        args.push(format!("--outdir={}", self.artifacts_dir.display()));

        Ok(args)
    }
}

impl Action for EsbuildBundleAction {
    fn name(&self) -> &'static str {
        "esbuild-bundle"
    }

    fn description(&self) -> String {
        let entries = self
            .bundler_config
            .entry_points()
            .map(|e| e.join(", "))
            .unwrap_or_else(|_| "<no entry points>".to_string());
        format!(
            "Bundle {} into {}",
            entries,
            self.artifacts_dir.display()
        )
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> Result<()> {
        let args = self.build_args(ctx)?;
        self.esbuild
            .run(ctx.osutils, &args, &self.scratch_dir)
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osutils::MockOsUtils;
    use serde_json::{json, Value};

    fn action(section: Value) -> EsbuildBundleAction {
        let map = match section {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        EsbuildBundleAction::new(
            PathBuf::from("scratch"),
            PathBuf::from("artifacts"),
            BundlerConfig::new(map),
            SubprocessEsbuild::new(vec![PathBuf::from("project/bin")]),
        )
    }

    #[test]
    fn runs_esbuild_with_default_options() {
        let os = MockOsUtils::new()
            .with_file("scratch/app.js")
            .with_executable("project/bin/esbuild");

        action(json!({"entry_points": ["app.js"]}))
            .execute(&ActionContext::new(&os))
            .unwrap();

        let calls = os.process_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            vec![
                "project/bin/esbuild",
                "scratch/app.js",
                "--bundle",
                "--platform=node",
                "--format=cjs",
                "--minify",
                "--sourcemap",
                "--target=es2020",
                "--outdir=artifacts",
            ]
        );
        assert_eq!(calls[0].cwd, PathBuf::from("scratch"));
    }

    #[test]
    fn honours_minify_sourcemap_and_target() {
        let os = MockOsUtils::new()
            .with_file("scratch/a.ts")
            .with_file("scratch/b.ts");

        let args = action(json!({
            "entry_points": ["a.ts", "b.ts"],
            "minify": false,
            "sourcemap": false,
            "target": "node18"
        }))
        .build_args(&ActionContext::new(&os))
        .unwrap();

        assert_eq!(
            args,
            vec![
                "scratch/a.ts",
                "scratch/b.ts",
                "--bundle",
                "--platform=node",
                "--format=cjs",
                "--target=node18",
                "--outdir=artifacts",
            ]
        );
    }

    #[test]
    fn missing_entry_point_file_fails_before_running() {
        let os = MockOsUtils::new().with_executable("project/bin/esbuild");

        let err = action(json!({"entry_points": ["app.js"]}))
            .execute(&ActionContext::new(&os))
            .unwrap_err();

        assert!(err.to_string().contains("does not exist"));
        assert!(os.process_calls().is_empty());
    }

    #[test]
    fn missing_entry_points_setting_fails() {
        let os = MockOsUtils::new();

        let err = action(json!({"bundler": "esbuild"}))
            .execute(&ActionContext::new(&os))
            .unwrap_err();

        assert!(matches!(err, NodeBundleError::BundleFailed { .. }));
    }

    #[test]
    fn missing_binary_fails() {
        let os = MockOsUtils::new().with_file("scratch/app.js");

        let err = action(json!({"entry_points": ["app.js"]}))
            .execute(&ActionContext::new(&os))
            .unwrap_err();

        assert!(matches!(err, NodeBundleError::EsbuildNotFound { .. }));
    }

    #[test]
    fn description_lists_entry_points() {
        let a = action(json!({"entry_points": ["app.js", "worker.js"]}));
        assert_eq!(a.description(), "Bundle app.js, worker.js into artifacts");
    }
}
