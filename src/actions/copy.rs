//! Copy the project sources into the scratch directory.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::{Action, ActionContext};

/// Names never copied into the scratch directory.
pub const EXCLUDED_FILES: &[&str] = &[".aws-sam", ".git", "node_modules"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySourceAction {
    source_dir: PathBuf,
    dest_dir: PathBuf,
}

impl CopySourceAction {
    pub fn new(source_dir: PathBuf, dest_dir: PathBuf) -> Self {
        Self {
            source_dir,
            dest_dir,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }
}

impl Action for CopySourceAction {
    fn name(&self) -> &'static str {
        "copy-source"
    }

    fn description(&self) -> String {
        format!(
            "Copy {} to {}",
            self.source_dir.display(),
            self.dest_dir.display()
        )
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> Result<()> {
        ctx.osutils
            .copy_tree(&self.source_dir, &self.dest_dir, EXCLUDED_FILES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osutils::{MockOsUtils, SystemOsUtils};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn copies_with_default_excludes() {
        let os = MockOsUtils::new();
        let action = CopySourceAction::new("source".into(), "scratch".into());

        action.execute(&ActionContext::new(&os)).unwrap();

        let calls = os.copy_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].source, PathBuf::from("source"));
        assert_eq!(calls[0].dest, PathBuf::from("scratch"));
        assert_eq!(calls[0].excludes, vec![".aws-sam", ".git", "node_modules"]);
    }

    #[test]
    fn copies_real_tree() {
        let source = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        fs::write(source.path().join("package.json"), "{}").unwrap();
        fs::create_dir_all(source.path().join(".aws-sam/build")).unwrap();

        let os = SystemOsUtils::new();
        CopySourceAction::new(source.path().into(), scratch.path().into())
            .execute(&ActionContext::new(&os))
            .unwrap();

        assert!(scratch.path().join("package.json").is_file());
        assert!(!scratch.path().join(".aws-sam").exists());
    }

    #[test]
    fn description_names_both_directories() {
        let action = CopySourceAction::new("source".into(), "scratch".into());
        assert_eq!(action.description(), "Copy source to scratch");
    }
}
