use super::GitCommand;
use anyhow::{Context, Result};
use std::path::Path;

impl GitCommand {
    pub fn worktree_list_porcelain_in(&self, root: &Path) -> Result<String> {
        let output = self
            .git()
            .arg("-C")
            .arg(root)
            .args(["worktree", "list", "--porcelain"])
            .output()
            .context("Failed to execute git worktree list command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree list failed: {}", stderr.trim());
        }

        String::from_utf8(output.stdout).context("Failed to parse git worktree list output")
    }

    pub fn worktree_remove_in(&self, root: &Path, path: &Path, force: bool) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("-C").arg(root).args(["worktree", "remove"]);

        if force {
            cmd.arg("--force");
        }

        cmd.arg(path);

        let output = cmd
            .output()
            .context("Failed to execute git worktree remove command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree remove failed: {}", stderr.trim());
        }

        Ok(())
    }

    pub fn branch_force_delete_in(&self, root: &Path, branch: &str) -> Result<()> {
        let output = self
            .git()
            .arg("-C")
            .arg(root)
            .args(["branch", "-D", branch])
            .output()
            .context("Failed to execute git branch command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git branch delete failed: {}", stderr.trim());
        }

        Ok(())
    }
}
