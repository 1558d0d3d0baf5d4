//! Per-branch metadata persisted in git config.
//!
//! Keys live under the branch section of the main repository's config:
//!
//! | Key | Value |
//! |-----|-------|
//! | `branch.<b>.gh-worktree-pr-number` | PR number |
//! | `branch.<b>.gh-worktree-pr-title` | sanitized PR title |
//! | `branch.<b>.gh-worktree-type` | `pr` or `branch` |
//!
//! Only the main repository's config is authoritative; linked worktrees share
//! it, so every read and write goes through the repository root.

use crate::git::RepoGateway;
use crate::validate::{sanitize_for_config, validate_branch_name, PrNumber};
use crate::CONFIG_PREFIX;
use anyhow::Result;
use std::fmt;
use std::path::Path;

pub const PR_NUMBER_FIELD: &str = "pr-number";
pub const PR_TITLE_FIELD: &str = "pr-title";
pub const TYPE_FIELD: &str = "type";

/// Builds `branch.<branch>.gh-worktree-<field>`.
pub fn config_key(branch: &str, field: &str) -> String {
    format!("branch.{branch}.{CONFIG_PREFIX}-{field}")
}

/// The persisted kind of a managed worktree.
///
/// An absent tag means "unset". The only transitions are
/// unset → `Pr` (PR checkout), unset → `Branch` (branch checkout) and
/// `Branch` → `Pr` (promotion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorktreeType {
    Pr,
    Branch,
}

impl WorktreeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pr => "pr",
            Self::Branch => "branch",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pr" => Some(Self::Pr),
            "branch" => Some(Self::Branch),
            _ => None,
        }
    }
}

impl fmt::Display for WorktreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and writes the metadata of branches in one repository.
pub struct BranchMetadata<'a, G: RepoGateway + ?Sized> {
    gateway: &'a G,
    root: &'a Path,
}

impl<'a, G: RepoGateway + ?Sized> BranchMetadata<'a, G> {
    pub fn new(gateway: &'a G, root: &'a Path) -> Self {
        Self { gateway, root }
    }

    fn get(&self, branch: &str, field: &str) -> Result<Option<String>> {
        let value = self.gateway.config_get(self.root, &config_key(branch, field))?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    fn set(&self, branch: &str, field: &str, value: &str) -> Result<()> {
        self.gateway
            .config_set(self.root, &config_key(branch, field), value)
    }

    /// The stored PR number. Unparseable or out-of-range values read as absent.
    pub fn pr_number(&self, branch: &str) -> Result<Option<PrNumber>> {
        Ok(self
            .get(branch, PR_NUMBER_FIELD)?
            .and_then(|v| PrNumber::parse(&v).ok()))
    }

    pub fn pr_title(&self, branch: &str) -> Result<Option<String>> {
        self.get(branch, PR_TITLE_FIELD)
    }

    /// The explicit type tag, without inference.
    pub fn type_tag(&self, branch: &str) -> Result<Option<WorktreeType>> {
        Ok(self
            .get(branch, TYPE_FIELD)?
            .and_then(|v| WorktreeType::parse(&v)))
    }

    /// The type tag, falling back to `Pr` for branches that carry a PR
    /// number but predate the tag.
    pub fn worktree_type(&self, branch: &str) -> Result<Option<WorktreeType>> {
        if let Some(tag) = self.type_tag(branch)? {
            return Ok(Some(tag));
        }
        if self.pr_number(branch)?.is_some() {
            return Ok(Some(WorktreeType::Pr));
        }
        Ok(None)
    }

    pub fn set_type(&self, branch: &str, kind: WorktreeType) -> Result<()> {
        validate_branch_name(branch)?;
        self.set(branch, TYPE_FIELD, kind.as_str())
    }

    /// Writes the PR number and sanitized title.
    pub fn set_pr(&self, branch: &str, number: PrNumber, title: &str) -> Result<()> {
        validate_branch_name(branch)?;
        self.set(branch, PR_NUMBER_FIELD, &number.to_string())?;
        self.set(branch, PR_TITLE_FIELD, &sanitize_for_config(title))
    }
}
