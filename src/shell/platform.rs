//! Platform and environment checks.

/// Environment variables that signal a CI runner.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "CODEBUILD_BUILD_ID",
];

/// Check if running in a CI environment.
///
/// Used to hide spinners in [`TerminalUI`](crate::ui::TerminalUI) when
/// output is going to a build log.
pub fn is_ci() -> bool {
    is_ci_with_env(|key| std::env::var(key).ok())
}

/// Check for CI with a custom env var lookup function.
pub fn is_ci_with_env<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    CI_VARS.iter().any(|var| env_fn(var).is_some())
}

/// Check if the host is Windows.
pub fn is_windows() -> bool {
    cfg!(target_os = "windows")
}
