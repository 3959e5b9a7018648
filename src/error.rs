//! Error types for nodebundle operations.
//!
//! This module defines [`NodeBundleError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `NodeBundleError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `NodeBundleError::Other`) for unexpected errors
//! - Action failures are wrapped in `WorkflowFailed` by the workflow runner

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nodebundle operations.
#[derive(Debug, Error)]
pub enum NodeBundleError {
    /// The manifest is missing or is not valid JSON.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Architecture outside of the supported set.
    #[error("Unsupported architecture '{value}' (expected x86_64 or arm64)")]
    UnsupportedArchitecture { value: String },

    /// Build configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse build configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A subprocess could not be started.
    #[error("Failed to start '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    /// npm exited with a non-zero status.
    #[error("npm {args} failed: {message}")]
    NpmExecution { args: String, message: String },

    /// `npm bin` succeeded but printed nothing.
    #[error("npm bin returned an empty path (cwd: {cwd})")]
    EmptyBinPath { cwd: PathBuf },

    /// Dependency installation failed.
    #[error("Dependency installation failed: {message}")]
    InstallFailed { message: String },

    /// No esbuild binary in any search path entry.
    #[error("Cannot find esbuild in search paths: {search_paths}")]
    EsbuildNotFound { search_paths: String },

    /// Bundling failed (bad configuration or esbuild exited non-zero).
    #[error("Bundling failed: {message}")]
    BundleFailed { message: String },

    /// A workflow action failed and the remaining actions were not run.
    #[error("{workflow}:{action} - {reason}")]
    WorkflowFailed {
        workflow: String,
        action: String,
        reason: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for nodebundle operations.
pub type Result<T> = std::result::Result<T, NodeBundleError>;
