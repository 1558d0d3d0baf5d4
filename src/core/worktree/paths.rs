//! Where managed worktrees live.
//!
//! Worktrees are siblings of the main worktree:
//!
//! ```text
//! ~/src/project            main worktree
//! ~/src/project-pr123      PR #123
//! ~/src/project-feature-x  branch feature/x
//! ```

use crate::validate::{validate_branch_name, PrNumber};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Turns a branch name into a directory-name fragment.
///
/// `/` becomes `-`, runs of `.` collapse to one, and leading `.` or `-`
/// are stripped so the result is never hidden or option-like. A fragment of
/// the form `pr<digits>` gets a `-branch` suffix so it cannot take the
/// directory of a PR worktree.
pub fn normalize_branch_for_path(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len());
    for c in branch.chars() {
        let c = if c == '/' { '-' } else { c };
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }
    let fragment = out.trim_start_matches(['.', '-']).to_string();
    if is_pr_fragment(&fragment) {
        format!("{fragment}-branch")
    } else {
        fragment
    }
}

fn is_pr_fragment(fragment: &str) -> bool {
    fragment
        .strip_prefix("pr")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Final component of the main worktree path.
pub fn repo_dir_name(root: &Path) -> Result<String> {
    root.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot determine repository name from {}", root.display()))
}

fn parent_dir(root: &Path) -> Result<&Path> {
    root.parent()
        .with_context(|| format!("Repository root {} has no parent directory", root.display()))
}

/// `<parent>/<repo>-pr<number>`
pub fn pr_worktree_path(root: &Path, number: PrNumber) -> Result<PathBuf> {
    let repo = repo_dir_name(root)?;
    Ok(parent_dir(root)?.join(format!("{repo}-pr{number}")))
}

/// `<parent>/<repo>-<normalized branch>`
pub fn branch_worktree_path(root: &Path, branch: &str) -> Result<PathBuf> {
    validate_branch_name(branch)?;
    let fragment = normalize_branch_for_path(branch);
    if fragment.is_empty() {
        anyhow::bail!("Cannot derive a directory name from branch '{branch}'");
    }
    let repo = repo_dir_name(root)?;
    Ok(parent_dir(root)?.join(format!("{repo}-{fragment}")))
}

/// Canonical form used for path comparisons, tolerant of missing paths.
pub fn resolve(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Renders `path` relative to `base` when possible, for display and `cd`.
pub fn display_relative(path: &Path, base: &Path) -> PathBuf {
    pathdiff::diff_paths(resolve(path), resolve(base)).unwrap_or_else(|| path.to_path_buf())
}
