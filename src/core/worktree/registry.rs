//! Discovery and classification of the worktrees this tool manages.
//!
//! The source of truth is `git worktree list --porcelain`. Each entry is
//! classified by an ordered fallback chain:
//!
//! 1. the main worktree is [`WorktreeKind::Main`];
//! 2. a sibling named `<repo>-pr<digits>` is a PR worktree;
//! 3. otherwise the branch's persisted type tag decides;
//! 4. otherwise a sibling named `<repo>-…` is a branch worktree;
//! 5. anything else is not ours and is left out.

use super::paths::{normalize_branch_for_path, repo_dir_name, resolve};
use crate::core::metadata::{BranchMetadata, WorktreeType};
use crate::git::RepoGateway;
use crate::selector::Selector;
use crate::validate::PrNumber;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One entry of `git worktree list --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PorcelainEntry {
    pub path: PathBuf,
    pub head: Option<String>,
    pub branch: Option<String>,
    pub is_bare: bool,
    pub is_detached: bool,
}

pub fn parse_porcelain(output: &str) -> Vec<PorcelainEntry> {
    let mut entries = Vec::new();
    let mut current: Option<PorcelainEntry> = None;

    for line in output.lines() {
        if let Some(path_str) = line.strip_prefix("worktree ") {
            // Save previous entry if any
            entries.extend(current.take());
            current = Some(PorcelainEntry {
                path: PathBuf::from(path_str),
                head: None,
                branch: None,
                is_bare: false,
                is_detached: false,
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        if let Some(sha) = line.strip_prefix("HEAD ") {
            entry.head = Some(sha.to_string());
        } else if let Some(branch_ref) = line.strip_prefix("branch ") {
            entry.branch = Some(
                branch_ref
                    .strip_prefix("refs/heads/")
                    .unwrap_or(branch_ref)
                    .to_string(),
            );
        } else if line == "bare" {
            entry.is_bare = true;
        } else if line == "detached" {
            entry.is_detached = true;
        }
    }
    entries.extend(current);

    entries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorktreeKind {
    Main,
    Pr,
    Branch,
}

/// A classified worktree, enriched with persisted PR metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorktreeDescriptor {
    pub path: PathBuf,
    pub commit: String,
    pub branch: Option<String>,
    pub kind: WorktreeKind,
    pub pr_number: Option<PrNumber>,
    pub title: Option<String>,
}

impl WorktreeDescriptor {
    pub fn dir_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// `#12` for PR worktrees, the branch (or directory) name otherwise.
    pub fn label(&self) -> String {
        match (self.kind, self.pr_number) {
            (WorktreeKind::Pr, Some(n)) => format!("#{n}"),
            _ => self
                .branch
                .clone()
                .unwrap_or_else(|| self.dir_name().to_string()),
        }
    }

    pub fn title_or_placeholder(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("(no title)")
    }
}

/// Extracts the number from a `<repo>-pr<digits>` directory name.
pub fn pr_number_from_dir_name(dir_name: &str, repo_name: &str) -> Option<PrNumber> {
    let digits = dir_name.strip_prefix(repo_name)?.strip_prefix("-pr")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    PrNumber::parse(digits).ok()
}

/// The managed worktrees of one repository.
pub struct Registry<'a, G: RepoGateway + ?Sized> {
    gateway: &'a G,
    root: PathBuf,
    resolved_root: PathBuf,
    resolved_parent: PathBuf,
    repo_name: String,
}

impl<'a, G: RepoGateway + ?Sized> Registry<'a, G> {
    /// Opens the registry of the repository the gateway points at.
    pub fn open(gateway: &'a G) -> Result<Self> {
        let root = gateway.resolve_root()?;
        Self::new(gateway, root)
    }

    pub fn new(gateway: &'a G, root: PathBuf) -> Result<Self> {
        let repo_name = repo_dir_name(&root)?;
        let resolved_root = resolve(&root);
        let resolved_parent = root
            .parent()
            .map(resolve)
            .with_context(|| format!("Repository root {} has no parent", root.display()))?;
        Ok(Self {
            gateway,
            root,
            resolved_root,
            resolved_parent,
            repo_name,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    fn metadata(&self) -> BranchMetadata<'_, G> {
        BranchMetadata::new(self.gateway, &self.root)
    }

    /// Every worktree we recognize, main worktree first.
    pub fn list(&self) -> Result<Vec<WorktreeDescriptor>> {
        let porcelain = self
            .gateway
            .worktree_list_porcelain(&self.root)
            .context("Failed to list worktrees")?;

        let mut found: Vec<WorktreeDescriptor> = parse_porcelain(&porcelain)
            .iter()
            .filter_map(|entry| self.classify(entry))
            .collect();
        found.sort_by_key(|wt| wt.kind != WorktreeKind::Main);
        Ok(found)
    }

    /// PR worktrees ordered by number.
    pub fn pr_worktrees(&self) -> Result<Vec<WorktreeDescriptor>> {
        let mut prs: Vec<_> = self
            .list()?
            .into_iter()
            .filter(|wt| wt.kind == WorktreeKind::Pr)
            .collect();
        prs.sort_by_key(|wt| wt.pr_number);
        Ok(prs)
    }

    /// Branch worktrees ordered by path.
    pub fn branch_worktrees(&self) -> Result<Vec<WorktreeDescriptor>> {
        let mut branches: Vec<_> = self
            .list()?
            .into_iter()
            .filter(|wt| wt.kind == WorktreeKind::Branch)
            .collect();
        branches.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(branches)
    }

    /// PR worktrees, followed by branch worktrees when `include_branches` is set.
    pub fn managed(&self, include_branches: bool) -> Result<Vec<WorktreeDescriptor>> {
        let mut all = self.pr_worktrees()?;
        if include_branches {
            all.extend(self.branch_worktrees()?);
        }
        Ok(all)
    }

    /// Classifies one porcelain entry. `None` means the worktree is not ours.
    pub fn classify(&self, entry: &PorcelainEntry) -> Option<WorktreeDescriptor> {
        if entry.is_bare {
            return None;
        }

        let descriptor = |kind, pr_number, title| WorktreeDescriptor {
            path: entry.path.clone(),
            commit: entry.head.clone().unwrap_or_default(),
            branch: entry.branch.clone(),
            kind,
            pr_number,
            title,
        };

        if entry.path == self.root || resolve(&entry.path) == self.resolved_root {
            return Some(descriptor(WorktreeKind::Main, None, None));
        }
        // Compare parents only; the worktree directory itself may be gone.
        let parent = entry.path.parent()?;
        if parent != self.root.parent()? && resolve(parent) != self.resolved_parent {
            return None;
        }

        let dir_name = entry.path.file_name()?.to_str()?;
        let meta = self.metadata();
        let branch = entry.branch.as_deref();
        // Missing or unreadable metadata reads as absent.
        let title = branch.and_then(|b| meta.pr_title(b).ok().flatten());

        if let Some(number) = pr_number_from_dir_name(dir_name, &self.repo_name) {
            return Some(descriptor(WorktreeKind::Pr, Some(number), title));
        }

        let tag = branch.and_then(|b| meta.worktree_type(b).ok().flatten());
        match tag {
            Some(WorktreeType::Pr) => {
                let number = branch.and_then(|b| meta.pr_number(b).ok().flatten());
                Some(descriptor(WorktreeKind::Pr, number, title))
            }
            Some(WorktreeType::Branch) => Some(descriptor(WorktreeKind::Branch, None, None)),
            None if dir_name.starts_with(&format!("{}-", self.repo_name)) => {
                Some(descriptor(WorktreeKind::Branch, None, None))
            }
            None => None,
        }
    }

    /// Resolves a selector to a managed (non-main) worktree.
    ///
    /// Branch selectors match the checked-out branch first, then the
    /// directory name, either verbatim or as `<repo>-<normalized branch>`.
    pub fn find(&self, selector: &Selector) -> Result<Option<WorktreeDescriptor>> {
        let managed = self.managed(true)?;

        let found = match selector {
            Selector::Pr { number, .. } => managed
                .into_iter()
                .find(|wt| wt.kind == WorktreeKind::Pr && wt.pr_number == Some(*number)),
            Selector::Branch(name) => {
                let expected_dir = format!("{}-{}", self.repo_name, normalize_branch_for_path(name));
                let by_branch = managed
                    .iter()
                    .position(|wt| wt.branch.as_deref() == Some(name.as_str()));
                let index = by_branch.or_else(|| {
                    managed
                        .iter()
                        .position(|wt| wt.dir_name() == name || wt.dir_name() == expected_dir)
                });
                index.map(|i| managed[i].clone())
            }
        };

        Ok(found)
    }
}
