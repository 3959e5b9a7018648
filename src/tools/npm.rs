//! npm invocation.

use std::path::Path;

use crate::error::{NodeBundleError, Result};
use crate::osutils::OsUtils;

/// Name of the npm executable on this host.
pub fn executable(osutils: &dyn OsUtils) -> &'static str {
    if osutils.is_windows() {
        "npm.cmd"
    } else {
        "npm"
    }
}

/// Run npm with `args` in `cwd` and return its trimmed stdout.
///
/// A non-zero exit becomes [`NodeBundleError::NpmExecution`] carrying the
/// trimmed stderr.
pub fn run(osutils: &dyn OsUtils, args: &[&str], cwd: &Path) -> Result<String> {
    let mut invocation = vec![executable(osutils).to_string()];
    invocation.extend(args.iter().map(|a| a.to_string()));

    tracing::debug!("Running npm {} in {}", args.join(" "), cwd.display());

    let result = osutils.run_process(&invocation, cwd)?;
    if !result.success {
        return Err(NodeBundleError::NpmExecution {
            args: args.join(" "),
            message: result.stderr.trim().to_string(),
        });
    }

    Ok(result.stdout.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osutils::MockOsUtils;
    use std::path::PathBuf;

    #[test]
    fn uses_npm_on_unix_hosts() {
        let os = MockOsUtils::new().queue_output("ok\n");

        let out = run(&os, &["bin"], Path::new("scratch_dir")).unwrap();

        assert_eq!(out, "ok");
        let calls = os.process_calls();
        assert_eq!(calls[0].args, vec!["npm".to_string(), "bin".to_string()]);
        assert_eq!(calls[0].cwd, PathBuf::from("scratch_dir"));
    }

    #[test]
    fn uses_npm_cmd_on_windows() {
        let os = MockOsUtils::new().with_windows(true);

        run(&os, &["ci"], Path::new("scratch")).unwrap();

        assert_eq!(os.process_calls()[0].args[0], "npm.cmd");
    }

    #[test]
    fn non_zero_exit_is_an_error_with_stderr() {
        let os = MockOsUtils::new().queue_failure(1, "  npm ERR! missing script\n");

        let err = run(&os, &["ci"], Path::new("scratch")).unwrap_err();

        match err {
            NodeBundleError::NpmExecution { args, message } => {
                assert_eq!(args, "ci");
                assert_eq!(message, "npm ERR! missing script");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
