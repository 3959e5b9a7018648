//! Subprocess execution.

use crate::error::{NodeBundleError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,
}

/// Render an argument vector for logs and error messages.
pub fn display_command(args: &[String]) -> String {
    args.join(" ")
}

/// Execute a program with piped stdout and stderr.
///
/// The first element of `args` is the program, the rest are passed to it
/// verbatim (no shell is involved). A non-zero exit is reported through
/// [`CommandResult::success`], not as an error.
pub fn execute(args: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| NodeBundleError::SpawnFailed {
            command: String::new(),
            message: "empty command".to_string(),
        })?;

    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(rest);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Executing: {}", display_command(args));

    let output = cmd.output().map_err(|e| NodeBundleError::SpawnFailed {
        command: display_command(args),
        message: e.to_string(),
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}
