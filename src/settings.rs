//! Git config-based settings for gh-worktree.
//!
//! Settings are loaded from git's layered config system (local → global)
//! with built-in defaults as fallback.
//!
//! # Config Keys
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `gh-worktree.setup` | `true` | Run `.gh-worktree.yml` setup after creating a worktree |
//! | `gh-worktree.recurseSubmodules` | `false` | Initialize submodules in new PR worktrees |
//! | `gh-worktree.deleteBranch` | `true` | Delete the local branch when removing a worktree |
//!
//! # Example
//!
//! ```bash
//! # Never run setup commands
//! git config --global gh-worktree.setup false
//!
//! # Always check out submodules in this repository
//! git config gh-worktree.recurseSubmodules true
//! ```

use crate::git::GitCommand;
use anyhow::Result;

/// Default values for settings.
pub mod defaults {
    pub const SETUP: bool = true;
    pub const RECURSE_SUBMODULES: bool = false;
    pub const DELETE_BRANCH: bool = true;
}

/// Git config keys for gh-worktree settings.
pub mod keys {
    pub const SETUP: &str = "gh-worktree.setup";
    pub const RECURSE_SUBMODULES: &str = "gh-worktree.recurseSubmodules";
    pub const DELETE_BRANCH: &str = "gh-worktree.deleteBranch";
}

/// User-configurable settings.
///
/// Settings are loaded from git config with the following priority:
/// 1. Repository-local config (`git config gh-worktree.x`)
/// 2. Global config (`git config --global gh-worktree.x`)
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeSettings {
    /// Run post-creation setup commands.
    pub run_setup: bool,
    /// Default for `--recurse-submodules`.
    pub recurse_submodules: bool,
    /// Delete the local branch on `remove` unless `--keep-branch` is given.
    pub delete_branch: bool,
}

impl Default for WorktreeSettings {
    fn default() -> Self {
        Self {
            run_setup: defaults::SETUP,
            recurse_submodules: defaults::RECURSE_SUBMODULES,
            delete_branch: defaults::DELETE_BRANCH,
        }
    }
}

impl WorktreeSettings {
    /// Load settings from the repository containing the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&GitCommand::new(true))
    }

    /// Load settings through `git`, which may point at another directory.
    pub fn load_from(git: &GitCommand) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(value) = git.config_get(keys::SETUP)? {
            settings.run_setup = parse_bool(&value, defaults::SETUP);
        }

        if let Some(value) = git.config_get(keys::RECURSE_SUBMODULES)? {
            settings.recurse_submodules = parse_bool(&value, defaults::RECURSE_SUBMODULES);
        }

        if let Some(value) = git.config_get(keys::DELETE_BRANCH)? {
            settings.delete_branch = parse_bool(&value, defaults::DELETE_BRANCH);
        }

        Ok(settings)
    }
}

/// Parse a git config boolean value.
///
/// Git accepts various boolean representations:
/// - true: `true`, `yes`, `on`, `1`
/// - false: `false`, `no`, `off`, `0`
///
/// Returns the default value if parsing fails.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => true,
        "false" | "no" | "off" | "0" => false,
        _ => default,
    }
}
