use super::GitCommand;
use anyhow::{Context, Result};
use std::path::Path;

impl GitCommand {
    /// Get a git config value (respects local + global config)
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        let output = self
            .git()
            .args(["config", "--get", key])
            .output()
            .context("Failed to execute git config command")?;

        if output.status.success() {
            let value = String::from_utf8(output.stdout)
                .context("Failed to parse git config output")?
                .trim()
                .to_string();
            Ok(Some(value))
        } else {
            // Exit code 1 means the key was not found, which is not an error
            Ok(None)
        }
    }

    /// Get a value from the local config of the repository at `path`.
    pub fn config_get_local(&self, path: &Path, key: &str) -> Result<Option<String>> {
        let output = self
            .git()
            .arg("-C")
            .arg(path)
            .args(["config", "--local", "--get", key])
            .output()
            .context("Failed to execute git config command")?;

        if output.status.success() {
            let value = String::from_utf8(output.stdout)
                .context("Failed to parse git config output")?
                .trim()
                .to_string();
            return Ok(Some(value));
        }

        match output.status.code() {
            Some(1) => Ok(None),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!("Git config --get {} failed: {}", key, stderr.trim())
            }
        }
    }

    /// Set a value in the local config of the repository at `path`.
    pub fn config_set_local(&self, path: &Path, key: &str, value: &str) -> Result<()> {
        let output = self
            .git()
            .arg("-C")
            .arg(path)
            .args(["config", key, value])
            .output()
            .context("Failed to execute git config command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git config failed: {}", stderr.trim());
        }

        Ok(())
    }
}
