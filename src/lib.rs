//! gh-worktree: check out GitHub pull requests and feature branches into
//! sibling git worktrees.
//!
//! The binary is installed as a `gh` extension, so users invoke it as
//! `gh worktree pr checkout 123`. Everything below the command layer is
//! usable as a library and is exercised by the integration tests.

pub mod commands;
pub mod core;
pub mod git;
pub mod github;
pub mod hooks;
pub mod logging;
pub mod output;
pub mod selector;
pub mod settings;
pub mod styles;
pub mod validate;

/// Version string, including the commit hash for development builds.
pub const VERSION: &str = env!("GH_WORKTREE_VERSION");

/// Prefix used for every git config key this tool writes.
pub const CONFIG_PREFIX: &str = "gh-worktree";

/// Name of the optional per-repository setup file.
pub const SETUP_CONFIG_FILE: &str = ".gh-worktree.yml";

/// Environment variable exported to setup commands, pointing at the main worktree.
pub const MAIN_DIR_ENV: &str = "GH_WORKTREE_MAIN_DIR";

/// Environment variable that overrides the repository the PR API talks to.
pub const REPO_OVERRIDE_ENV: &str = "GH_REPO";
