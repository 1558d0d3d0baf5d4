//! Post-create setup for new worktrees.
//!
//! A repository can check in a `.gh-worktree.yml` at the root of its main
//! worktree listing shell commands to run inside every freshly created
//! worktree:
//!
//! ```yaml
//! setup:
//!   run:
//!     - npm ci
//!     - cp "$GH_WORKTREE_MAIN_DIR/.env" .env
//! ```
//!
//! Commands run in order through `sh -c` with the new worktree as working
//! directory and `GH_WORKTREE_MAIN_DIR` exported. A failing command produces
//! a warning; it never aborts the remaining commands or the checkout.

mod config;
mod executor;

pub use config::{load_setup_config, SetupConfig, SetupSection};
pub use executor::{SetupExecutor, SetupResult};

use std::path::PathBuf;

/// Everything a setup run needs to know about the worktree it runs in.
#[derive(Debug, Clone)]
pub struct SetupContext {
    /// The worktree that was just created.
    pub worktree_path: PathBuf,
    /// The main worktree, where `.gh-worktree.yml` is read from.
    pub main_worktree: PathBuf,
    /// Send command stdout to stderr, keeping stdout clean for `--shell`.
    pub stdout_to_stderr: bool,
}

impl SetupContext {
    pub fn new(worktree_path: PathBuf, main_worktree: PathBuf) -> Self {
        Self {
            worktree_path,
            main_worktree,
            stdout_to_stderr: false,
        }
    }

    pub fn with_stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}
