//! Core logic for promoting a branch worktree to a PR worktree.

use crate::core::metadata::{BranchMetadata, WorktreeType};
use crate::git::RepoGateway;
use crate::validate::PrNumber;
use anyhow::Result;
use std::path::Path;

/// Input parameters for a promotion.
pub struct PromoteParams<'a> {
    pub branch: &'a str,
    pub number: PrNumber,
    pub title: &'a str,
}

/// Records that `branch` now backs a PR.
///
/// The three config writes are not atomic: a failure part-way leaves the
/// fields written so far in place.
pub fn promote<G: RepoGateway + ?Sized>(
    gateway: &G,
    root: &Path,
    params: &PromoteParams<'_>,
) -> Result<()> {
    let meta = BranchMetadata::new(gateway, root);
    if meta.worktree_type(params.branch)? == Some(WorktreeType::Pr) {
        let existing = meta
            .pr_number(params.branch)?
            .map(|n| format!(" (#{n})"))
            .unwrap_or_default();
        anyhow::bail!(
            "Branch '{}' is already a PR worktree{existing}",
            params.branch
        );
    }

    meta.set_type(params.branch, WorktreeType::Pr)?;
    meta.set_pr(params.branch, params.number, params.title)
}

/// Effective type of `branch`, inferring `Pr` from a stored number.
pub fn get_type<G: RepoGateway + ?Sized>(
    gateway: &G,
    root: &Path,
    branch: &str,
) -> Result<Option<WorktreeType>> {
    BranchMetadata::new(gateway, root).worktree_type(branch)
}
