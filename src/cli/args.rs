//! CLI argument definitions.
//!
//! All arguments are defined with clap's derive macros. The main entry
//! point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::BuildConfig;

/// nodebundle - Build Node.js functions with npm and esbuild.
#[derive(Debug, Parser)]
#[command(name = "nodebundle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides SOURCE_DIR/nodebundle.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Copy, install and bundle a project into the artifacts directory
    Build(BuildArgs),

    /// Show the actions a build would run, without running them
    Plan(BuildArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by `build` and `plan`.
#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    /// Project directory containing package.json
    #[arg(default_value = ".")]
    pub source_dir: PathBuf,

    /// Directory the bundled output is written to
    #[arg(short, long)]
    pub artifacts_dir: PathBuf,

    /// Working directory for the copy and install (default: a temporary directory)
    #[arg(short, long)]
    pub scratch_dir: Option<PathBuf>,

    /// Manifest path (default: SOURCE_DIR/package.json)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Target architecture (x86_64 or arm64)
    #[arg(long)]
    pub architecture: Option<String>,

    /// Extra directory to search for executables (repeatable)
    #[arg(long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Enable an experimental feature, e.g. experimentalEsbuild (repeatable)
    #[arg(long = "experimental", value_name = "FLAG")]
    pub experimental_flags: Vec<String>,

    /// Build option as KEY=VALUE (repeatable)
    #[arg(short, long = "option", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub options: Vec<(String, String)>,
}

impl BuildArgs {
    /// Create arguments for a source and artifacts directory.
    pub fn new(source_dir: impl Into<PathBuf>, artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            artifacts_dir: artifacts_dir.into(),
            scratch_dir: None,
            manifest: None,
            architecture: None,
            search_paths: Vec::new(),
            experimental_flags: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Manifest path, defaulting to `package.json` in the source directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.source_dir.join("package.json"))
    }

    /// Command-line values as config overrides.
    pub fn overrides(&self) -> BuildConfig {
        BuildConfig {
            architecture: self.architecture.clone(),
            executable_search_paths: self.search_paths.clone(),
            experimental_flags: self.experimental_flags.clone(),
            options: self.options.iter().cloned().collect(),
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid KEY=VALUE: no `=` found in `{}`", s)),
    }
}
