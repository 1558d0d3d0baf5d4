//! Core logic for removing managed worktrees.

use super::registry::{WorktreeDescriptor, WorktreeKind};
use crate::core::ProgressSink;
use crate::git::RepoGateway;
use crate::validate::PrNumber;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Input parameters for a removal.
#[derive(Debug, Clone, Copy)]
pub struct RemoveParams {
    /// Pass `--force` to `git worktree remove`.
    pub force: bool,
    /// Delete the local branch afterwards.
    pub delete_branch: bool,
}

impl Default for RemoveParams {
    fn default() -> Self {
        Self {
            force: false,
            delete_branch: true,
        }
    }
}

/// Result of a removal.
#[derive(Debug, Clone)]
pub struct RemoveResult {
    pub path: PathBuf,
    pub branch: Option<String>,
    pub pr_number: Option<PrNumber>,
    pub title: Option<String>,
    pub branch_deleted: bool,
}

/// Removes `worktree` and optionally its branch.
///
/// Branch deletion is best effort: a failure is reported as a warning and
/// the removal still succeeds. Deleting the branch also drops its metadata.
pub fn remove_worktree<G: RepoGateway + ?Sized>(
    gateway: &G,
    root: &Path,
    worktree: &WorktreeDescriptor,
    params: RemoveParams,
    sink: &mut impl ProgressSink,
) -> Result<RemoveResult> {
    if worktree.kind == WorktreeKind::Main {
        anyhow::bail!("Refusing to remove the main worktree");
    }

    sink.on_step(&format!("Removing worktree at {}", worktree.path.display()));
    gateway
        .worktree_remove(root, &worktree.path, params.force)
        .with_context(|| format!("Failed to remove worktree {}", worktree.label()))?;

    let mut branch_deleted = false;
    if let (true, Some(branch)) = (params.delete_branch, worktree.branch.as_deref()) {
        match gateway.branch_delete(root, branch) {
            Ok(()) => {
                sink.on_debug(&format!("Deleted branch '{branch}'"));
                branch_deleted = true;
            }
            Err(e) => sink.on_warning(&format!("Could not delete branch '{branch}': {e:#}")),
        }
    }

    Ok(RemoveResult {
        path: worktree.path.clone(),
        branch: worktree.branch.clone(),
        pr_number: worktree.pr_number,
        title: worktree.title.clone(),
        branch_deleted,
    })
}
