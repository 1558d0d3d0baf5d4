//! Pull request metadata from GitHub.
//!
//! The GitHub API is reached through the `gh` CLI, which owns authentication
//! and host configuration. Everything here is read-only.

use crate::git::Remote;
use crate::validate::{validate_repo_name, PrNumber, ValidationError};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::{Command, Stdio};
use url::Url;
use which::which;

/// Open PRs fetched for interactive selection.
pub const OPEN_PR_PAGE_SIZE: u32 = 100;

/// An `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Result<Self, ValidationError> {
        validate_repo_name(owner)?;
        validate_repo_name(name)?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parses `OWNER/REPO` or `HOST/OWNER/REPO` (the `GH_REPO` format).
    pub fn parse_full_name(full: &str) -> Result<Self> {
        let parts: Vec<&str> = full.trim().trim_matches('/').split('/').collect();
        match parts.as_slice() {
            [owner, name] | [_, owner, name] => Ok(Self::new(owner, name)?),
            _ => anyhow::bail!("expected OWNER/REPO, got '{full}'"),
        }
    }

    /// Extracts the repository from a remote URL.
    ///
    /// Understands `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo.git`
    /// and the scp-like `git@host:owner/repo.git`.
    pub fn from_remote_url(remote_url: &str) -> Option<Self> {
        let path = match Url::parse(remote_url) {
            Ok(url) if url.has_host() => url.path().to_string(),
            _ => {
                // scp-like syntax: [user@]host:path
                let (_, path) = remote_url.split_once(':')?;
                if path.starts_with("//") {
                    return None;
                }
                path.to_string()
            }
        };

        let mut segments = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .rev();
        let name = segments.next()?;
        let owner = segments.next()?;
        let name = name.strip_suffix(".git").unwrap_or(name);
        Self::new(owner, name).ok()
    }

    /// Case-insensitive comparison, since GitHub treats owners and names that way.
    pub fn same_repo(&self, other: &RepoRef) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Determines the repository PR lookups run against.
///
/// An explicit override (the `GH_REPO` environment variable) wins; otherwise
/// the `upstream` remote is preferred over `origin`, then any other remote.
pub fn resolve_current_repo(remotes: &[Remote], override_repo: Option<&str>) -> Result<RepoRef> {
    if let Some(full) = override_repo.filter(|s| !s.trim().is_empty()) {
        return RepoRef::parse_full_name(full)
            .with_context(|| format!("Invalid repository override '{full}'"));
    }

    let ordered = ["upstream", "origin"]
        .iter()
        .filter_map(|name| remotes.iter().find(|r| r.name == *name))
        .chain(remotes.iter());

    for remote in ordered {
        if let Some(repo) = RepoRef::from_remote_url(&remote.url) {
            return Ok(repo);
        }
    }

    anyhow::bail!("Could not determine the GitHub repository from the configured remotes")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRepo {
    pub name: String,
    pub owner: RepoOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHead {
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// `None` when the fork the PR came from has been deleted.
    pub repo: Option<HeadRepo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRepo {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestBase {
    pub repo: BaseRepo,
}

/// The subset of the GitHub pull request object this tool needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub head: PullRequestHead,
    pub base: PullRequestBase,
    #[serde(default)]
    pub maintainer_can_modify: bool,
}

impl PullRequest {
    pub fn pr_number(&self) -> Result<PrNumber, ValidationError> {
        PrNumber::new(i64::try_from(self.number).unwrap_or(i64::MAX))
    }

    pub fn head_ref(&self) -> &str {
        &self.head.ref_name
    }

    pub fn head_owner(&self) -> Option<&str> {
        self.head.repo.as_ref().map(|r| r.owner.login.as_str())
    }

    pub fn head_repo_name(&self) -> Option<&str> {
        self.head.repo.as_ref().map(|r| r.name.as_str())
    }

    /// Label shown in the interactive picker.
    pub fn picker_label(&self) -> String {
        let origin = match (self.head_owner(), self.head_repo_name()) {
            (Some(owner), Some(name)) => format!("{owner}/{name}"),
            _ => "(deleted fork)".to_string(),
        };
        format!("#{}\t{}\t{}", self.number, self.head_ref(), origin)
    }
}

/// Source of pull request metadata.
pub trait PullRequestSource {
    fn fetch(&self, repo: &RepoRef, number: PrNumber) -> Result<PullRequest>;

    fn list_open(&self, repo: &RepoRef) -> Result<Vec<PullRequest>>;
}

/// [`PullRequestSource`] backed by `gh api`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GhCli;

impl GhCli {
    pub fn new() -> Self {
        Self
    }

    fn api<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        which("gh").context(
            "The GitHub CLI (gh) was not found in PATH. Install it from https://cli.github.com",
        )?;

        crate::log_debug!("gh api {endpoint}");
        let output = Command::new("gh")
            .args(["api", "-H", "Accept: application/vnd.github+json", endpoint])
            .stdin(Stdio::null())
            .output()
            .context("Failed to execute gh api command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("gh api {} failed: {}", endpoint, stderr.trim());
        }

        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse response from {endpoint}"))
    }
}

impl PullRequestSource for GhCli {
    fn fetch(&self, repo: &RepoRef, number: PrNumber) -> Result<PullRequest> {
        self.api(&format!(
            "repos/{}/{}/pulls/{}",
            repo.owner, repo.name, number
        ))
        .with_context(|| format!("Failed to fetch PR #{number} from {repo}"))
    }

    fn list_open(&self, repo: &RepoRef) -> Result<Vec<PullRequest>> {
        self.api(&format!(
            "repos/{}/{}/pulls?state=open&per_page={}",
            repo.owner, repo.name, OPEN_PR_PAGE_SIZE
        ))
        .with_context(|| format!("Failed to list open PRs for {repo}"))
    }
}
