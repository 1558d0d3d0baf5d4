//! Git plumbing.
//!
//! [`GitCommand`] shells out to the `git` binary. Higher layers talk to it
//! through the [`RepoGateway`] trait so the worktree logic can be tested
//! against an in-memory fake.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

mod batch;
mod config;
mod refs;
mod remote;
mod worktree;

#[cfg(test)]
pub(crate) mod fake;

pub use batch::GitInvocation;
pub use remote::{parse_remote_verbose, Remote};

pub struct GitCommand {
    pub(crate) quiet: bool,
    pub(crate) work_dir: Option<PathBuf>,
}

impl GitCommand {
    /// `quiet` routes the output of streamed commands to stderr so that
    /// stdout stays clean for shell integration.
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            work_dir: None,
        }
    }

    /// Runs every command from `dir` instead of the process working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub(crate) fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    pub(crate) fn base_dir(&self) -> Result<PathBuf> {
        match &self.work_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// Everything the worktree services need from a repository.
pub trait RepoGateway {
    /// Remotes with their fetch URLs, in configuration order.
    fn list_remotes(&self) -> Result<Vec<Remote>>;

    /// Directory of the main worktree, even when called from a linked worktree.
    fn resolve_root(&self) -> Result<PathBuf>;

    fn ref_exists(&self, full_ref: &str) -> Result<bool>;

    fn branch_exists(&self, name: &str) -> Result<bool> {
        self.ref_exists(&format!("refs/heads/{name}"))
    }

    /// Branch checked out at `path`, `None` when HEAD is detached.
    fn current_branch(&self, path: &Path) -> Result<Option<String>>;

    /// Reads a key from the local config of the repository at `path`.
    fn config_get(&self, path: &Path, key: &str) -> Result<Option<String>>;

    fn config_set(&self, path: &Path, key: &str, value: &str) -> Result<()>;

    /// Runs commands in order, stopping at the first failure.
    fn run_batch(&self, batch: &[GitInvocation]) -> Result<()>;

    /// Raw `git worktree list --porcelain` output for the repository at `root`.
    fn worktree_list_porcelain(&self, root: &Path) -> Result<String>;

    fn worktree_remove(&self, root: &Path, path: &Path, force: bool) -> Result<()>;

    /// Force-deletes a local branch.
    fn branch_delete(&self, root: &Path, branch: &str) -> Result<()>;
}

impl RepoGateway for GitCommand {
    fn list_remotes(&self) -> Result<Vec<Remote>> {
        self.remote_list_verbose()
    }

    fn resolve_root(&self) -> Result<PathBuf> {
        self.main_worktree_root()
    }

    fn ref_exists(&self, full_ref: &str) -> Result<bool> {
        self.show_ref_exists(full_ref)
    }

    fn current_branch(&self, path: &Path) -> Result<Option<String>> {
        self.current_branch_in(path)
    }

    fn config_get(&self, path: &Path, key: &str) -> Result<Option<String>> {
        self.config_get_local(path, key)
    }

    fn config_set(&self, path: &Path, key: &str, value: &str) -> Result<()> {
        self.config_set_local(path, key, value)
    }

    fn run_batch(&self, batch: &[GitInvocation]) -> Result<()> {
        self.execute_batch(batch)
    }

    fn worktree_list_porcelain(&self, root: &Path) -> Result<String> {
        self.worktree_list_porcelain_in(root)
    }

    fn worktree_remove(&self, root: &Path, path: &Path, force: bool) -> Result<()> {
        self.worktree_remove_in(root, path, force)
    }

    fn branch_delete(&self, root: &Path, branch: &str) -> Result<()> {
        self.branch_force_delete_in(root, branch)
    }
}
