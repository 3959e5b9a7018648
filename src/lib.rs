//! nodebundle - Build Node.js function packages with npm and esbuild.
//!
//! A build copies the project into a scratch directory, installs its
//! dependencies with `npm ci` (when a lockfile is present) or
//! `npm install`, and optionally bundles the entry points with esbuild
//! into an artifacts directory.
//!
//! # Modules
//!
//! - [`workflow`] - Workflow construction and the fail-fast runner
//! - [`actions`] - The copy, install and bundle actions
//! - [`manifest`] - `package.json` reading and bundler settings
//! - [`osutils`] - Filesystem and subprocess access behind a trait
//! - [`tools`] - npm and esbuild invocation
//! - [`config`] - `nodebundle.yml` loading
//! - [`cli`] - Command-line interface
//! - [`ui`] - Terminal output and spinners
//!
//! # Example
//!
//! ```
//! use nodebundle::actions::Action;
//! use nodebundle::osutils::MockOsUtils;
//! use nodebundle::workflow::{Workflow, WorkflowConfig};
//! use serde_json::json;
//!
//! let os = MockOsUtils::new()
//!     .with_json("app/package.json", json!({"name": "app"}))
//!     .with_file("app/package-lock.json");
//!
//! let config = WorkflowConfig::new("app", "out", "scratch", "app/package.json");
//! let workflow = Workflow::new(config, &os).unwrap();
//!
//! let names: Vec<_> = workflow.actions().iter().map(|a| a.name()).collect();
//! assert_eq!(names, ["copy-source", "npm-ci"]);
//! ```

pub mod actions;
pub mod architecture;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod osutils;
pub mod shell;
pub mod tools;
pub mod ui;
pub mod workflow;

pub use architecture::Architecture;
pub use error::{NodeBundleError, Result};
