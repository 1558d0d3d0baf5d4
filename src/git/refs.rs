use super::GitCommand;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

impl GitCommand {
    pub fn show_ref_exists(&self, ref_name: &str) -> Result<bool> {
        let output = self
            .git()
            .args(["show-ref", "--verify", "--quiet", ref_name])
            .output()
            .context("Failed to execute git show-ref command")?;

        Ok(output.status.success())
    }

    pub fn is_inside_work_tree(&self) -> Result<bool> {
        let output = self
            .git()
            .args(["rev-parse", "--is-inside-work-tree"])
            .output()
            .context("Failed to check if inside Git repository")?;

        Ok(output.status.success())
    }

    pub fn git_common_dir(&self) -> Result<PathBuf> {
        let output = self
            .git()
            .args(["rev-parse", "--git-common-dir"])
            .output()
            .context("Failed to execute git rev-parse command")?;

        if !output.status.success() {
            anyhow::bail!("Not inside a Git repository");
        }

        let path_str = String::from_utf8(output.stdout)
            .context("Failed to parse git common directory output")?
            .trim()
            .to_string();

        let path = PathBuf::from(path_str);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.base_dir()?.join(path))
        }
    }

    /// The main worktree is the parent of the shared git directory.
    pub fn main_worktree_root(&self) -> Result<PathBuf> {
        let common_dir = self.git_common_dir()?;
        let common_dir = common_dir.canonicalize().unwrap_or(common_dir);
        let root = common_dir
            .parent()
            .context("Failed to determine repository root directory")?;
        Ok(root.to_path_buf())
    }

    pub fn current_branch_in(&self, path: &Path) -> Result<Option<String>> {
        let output = self
            .git()
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .output()
            .context("Failed to execute git rev-parse command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git rev-parse --abbrev-ref HEAD failed: {}", stderr.trim());
        }

        let branch = String::from_utf8(output.stdout)
            .context("Failed to parse git rev-parse output")?
            .trim()
            .to_string();

        if branch.is_empty() || branch == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(branch))
        }
    }
}
