//! Git command synthesis for worktree creation.
//!
//! Everything here is pure: the functions inspect the PR, the remotes and the
//! options and return the exact list of git invocations to run. Execution and
//! metadata persistence live in [`super::create`].

use crate::git::{GitInvocation, Remote};
use crate::github::PullRequest;
use crate::validate::{validate_branch_name, validate_repo_name, validate_url, PrNumber};
use anyhow::{Context, Result};
use std::path::Path;

/// Options accepted by PR checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutOptions {
    pub recurse_submodules: bool,
    pub force: bool,
    pub detach: bool,
    /// Local branch name; defaults to the PR's head branch.
    pub branch_name: Option<String>,
    pub shell_mode: bool,
}

/// Repository state the synthesizer needs beyond the PR itself.
#[derive(Debug, Clone, Copy)]
pub struct Topology<'a> {
    pub remotes: &'a [Remote],
    /// Owner of the repository the PR was opened against.
    pub repo_owner: &'a str,
    /// Whether the local branch the PR will be checked out to already exists.
    pub local_branch_exists: bool,
}

/// The synthesized command batch plus the decisions behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub base_remote: String,
    /// Remote the PR's head branch was fetched from, if one is configured.
    pub head_remote: Option<String>,
    pub branch_name: String,
    pub steps: Vec<GitInvocation>,
}

/// Picks the remote the PR targets: `upstream`, then `origin`, then the first one.
pub fn select_base_remote(remotes: &[Remote]) -> Result<&Remote> {
    remotes
        .iter()
        .find(|r| r.name == "upstream")
        .or_else(|| remotes.iter().find(|r| r.name == "origin"))
        .or_else(|| remotes.first())
        .context("No git remotes configured; add one with 'git remote add origin <url>'")
}

/// Whether the PR comes from a repository owned by someone else.
pub fn is_cross_repository(pr: &PullRequest, repo_owner: &str) -> bool {
    match pr.head_owner() {
        Some(owner) => !owner.eq_ignore_ascii_case(repo_owner),
        // Deleted fork: the head cannot live in any configured remote.
        None => true,
    }
}

/// First remote whose URL mentions both the head owner and head repository name.
pub fn find_head_remote<'r>(remotes: &'r [Remote], pr: &PullRequest) -> Option<&'r Remote> {
    let owner = pr.head_owner()?;
    let name = pr.head_repo_name()?;
    remotes
        .iter()
        .find(|r| r.url.contains(owner) && r.url.contains(name))
}

/// Local branch the PR is checked out to.
pub fn local_branch_name(pr: &PullRequest, options: &CheckoutOptions) -> String {
    options
        .branch_name
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or(pr.head_ref())
        .to_string()
}

fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .with_context(|| format!("Worktree path {} is not valid UTF-8", path.display()))
}

fn config_step(path: &str, key: String, value: &str) -> GitInvocation {
    GitInvocation::new(["-C", path, "config", &key, value])
}

/// Builds the full command batch for checking out `pr` into `worktree_path`.
pub fn plan_pr_checkout(
    pr: &PullRequest,
    topology: Topology<'_>,
    options: &CheckoutOptions,
    worktree_path: &Path,
) -> Result<CheckoutPlan> {
    let base = select_base_remote(topology.remotes)?;
    let head = if is_cross_repository(pr, topology.repo_owner) {
        find_head_remote(topology.remotes, pr)
    } else {
        Some(base)
    };

    let branch = local_branch_name(pr, options);
    let path = path_arg(worktree_path)?;

    let mut steps = match head {
        Some(remote) => {
            steps_with_head_remote(pr, remote, &branch, &path, options, topology.local_branch_exists)?
        }
        None => steps_without_head_remote(pr, base, &branch, &path, options)?,
    };

    if options.recurse_submodules {
        steps.push(GitInvocation::new(["-C", &path, "submodule", "sync", "--recursive"]));
        steps.push(GitInvocation::new([
            "-C",
            &path,
            "submodule",
            "update",
            "--init",
            "--recursive",
        ]));
    }

    Ok(CheckoutPlan {
        base_remote: base.name.clone(),
        head_remote: head.map(|r| r.name.clone()),
        branch_name: branch,
        steps,
    })
}

/// The head branch is reachable through a configured remote.
fn steps_with_head_remote(
    pr: &PullRequest,
    remote: &Remote,
    branch: &str,
    path: &str,
    options: &CheckoutOptions,
    local_exists: bool,
) -> Result<Vec<GitInvocation>> {
    let head_ref = pr.head_ref();
    validate_branch_name(head_ref).context("Invalid head branch")?;
    validate_branch_name(branch).context("Invalid local branch")?;

    let tracking = format!("{}/{}", remote.name, head_ref);
    let tracking_ref = format!("refs/remotes/{tracking}");
    let mut steps = Vec::new();

    if options.detach {
        steps.push(GitInvocation::new([
            "fetch",
            &remote.name,
            &format!("+refs/heads/{head_ref}"),
            "--no-tags",
        ]));
        steps.push(GitInvocation::new([
            "worktree", "add", "--detach", path, "FETCH_HEAD",
        ]));
        return Ok(steps);
    }

    steps.push(GitInvocation::new([
        "fetch",
        &remote.name,
        &format!("+refs/heads/{head_ref}:{tracking_ref}"),
        "--no-tags",
    ]));

    if local_exists {
        if options.force {
            steps.push(GitInvocation::new(["worktree", "add", "--force", path, branch]));
            steps.push(GitInvocation::new(["-C", path, "reset", "--hard", &tracking_ref]));
        } else {
            steps.push(GitInvocation::new(["worktree", "add", path, branch]));
            steps.push(GitInvocation::new(["-C", path, "merge", "--ff-only", &tracking_ref]));
        }
    } else {
        steps.push(GitInvocation::new([
            "worktree", "add", "-b", branch, path, &tracking,
        ]));
        steps.push(config_step(path, format!("branch.{branch}.remote"), &remote.name));
        steps.push(config_step(
            path,
            format!("branch.{branch}.merge"),
            &format!("refs/heads/{head_ref}"),
        ));
    }

    Ok(steps)
}

/// The head lives in a fork with no configured remote; go through `refs/pull/<n>/head`.
fn steps_without_head_remote(
    pr: &PullRequest,
    base: &Remote,
    branch: &str,
    path: &str,
    options: &CheckoutOptions,
) -> Result<Vec<GitInvocation>> {
    let number: PrNumber = pr.pr_number()?;
    validate_branch_name(branch).context("Invalid local branch")?;
    let head_ref = pr.head_ref();
    validate_branch_name(head_ref).context("Invalid head branch")?;

    let pull_ref = format!("refs/pull/{number}/head");
    let mut steps = Vec::new();

    if options.detach {
        steps.push(GitInvocation::new(["fetch", &base.name, &pull_ref, "--no-tags"]));
        steps.push(GitInvocation::new([
            "worktree", "add", "--detach", path, "FETCH_HEAD",
        ]));
        return Ok(steps);
    }

    let mut fetch = vec![
        "fetch".to_string(),
        base.name.clone(),
        format!("{pull_ref}:{branch}"),
        "--no-tags".to_string(),
    ];
    if options.force {
        fetch.push("--force".to_string());
    }
    steps.push(GitInvocation::new(fetch));
    steps.push(GitInvocation::new(["worktree", "add", path, branch]));

    let mut merge_ref = pull_ref;
    if let (true, Some(owner), Some(repo)) = (
        pr.maintainer_can_modify,
        pr.head_owner(),
        pr.head_repo_name().filter(|n| !n.is_empty()),
    ) {
        validate_repo_name(repo).context("Invalid head repository name")?;
        validate_repo_name(owner).context("Invalid head repository owner")?;
        let push_url = format!("https://github.com/{owner}/{repo}");
        validate_url(&push_url).context("Invalid push remote URL")?;

        merge_ref = format!("refs/heads/{head_ref}");
        steps.push(config_step(path, format!("branch.{branch}.pushRemote"), &push_url));
    }

    steps.push(config_step(path, format!("branch.{branch}.remote"), &base.name));
    steps.push(config_step(path, format!("branch.{branch}.merge"), &merge_ref));

    Ok(steps)
}

/// Builds the command batch for a plain branch worktree.
///
/// `base_remote` is the remote searched for an existing remote-tracking
/// branch; `None` when the repository has no remotes.
pub fn plan_branch_worktree(
    branch: &str,
    worktree_path: &Path,
    base_remote: Option<&str>,
    local_exists: bool,
    remote_exists: bool,
) -> Result<Vec<GitInvocation>> {
    validate_branch_name(branch)?;
    let path = path_arg(worktree_path)?;

    if local_exists {
        return Ok(vec![GitInvocation::new(["worktree", "add", &path, branch])]);
    }

    match base_remote.filter(|_| remote_exists) {
        Some(remote) => Ok(vec![
            GitInvocation::new([
                "worktree",
                "add",
                "-b",
                branch,
                &path,
                &format!("{remote}/{branch}"),
            ]),
            config_step(&path, format!("branch.{branch}.remote"), remote),
            config_step(&path, format!("branch.{branch}.merge"), &format!("refs/heads/{branch}")),
        ]),
        None => Ok(vec![GitInvocation::new([
            "worktree", "add", "-b", branch, &path, "HEAD",
        ])]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{BaseRepo, HeadRepo, PullRequestBase, PullRequestHead, RepoOwner};

    const PATH: &str = "/src/project-pr42";

    fn remote(name: &str, url: &str) -> Remote {
        Remote {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    fn pr(head_owner: Option<&str>, head_ref: &str, can_modify: bool) -> PullRequest {
        PullRequest {
            number: 42,
            title: "Improve caching".to_string(),
            head: PullRequestHead {
                ref_name: head_ref.to_string(),
                repo: head_owner.map(|owner| HeadRepo {
                    name: "project".to_string(),
                    owner: RepoOwner {
                        login: owner.to_string(),
                    },
                }),
            },
            base: PullRequestBase {
                repo: BaseRepo {
                    full_name: "acme/project".to_string(),
                },
            },
            maintainer_can_modify: can_modify,
        }
    }

    fn origin_only() -> Vec<Remote> {
        vec![remote("origin", "git@github.com:acme/project.git")]
    }

    fn plan(
        pr: &PullRequest,
        remotes: &[Remote],
        options: &CheckoutOptions,
        local_exists: bool,
    ) -> Result<Vec<String>> {
        let topology = Topology {
            remotes,
            repo_owner: "acme",
            local_branch_exists: local_exists,
        };
        Ok(plan_pr_checkout(pr, topology, options, Path::new(PATH))?
            .steps
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    #[test]
    fn test_base_remote_preference() {
        let remotes = vec![
            remote("fork", "u1"),
            remote("origin", "u2"),
            remote("upstream", "u3"),
        ];
        assert_eq!(select_base_remote(&remotes).unwrap().name, "upstream");
        assert_eq!(select_base_remote(&remotes[..2]).unwrap().name, "origin");
        assert_eq!(select_base_remote(&remotes[..1]).unwrap().name, "fork");
        assert!(select_base_remote(&[]).is_err());
    }

    #[test]
    fn test_no_remotes_is_fatal() {
        let pr = pr(Some("acme"), "feature", false);
        assert!(plan(&pr, &[], &CheckoutOptions::default(), false).is_err());
    }

    #[test]
    fn test_same_repo_new_branch() {
        let pr = pr(Some("acme"), "feature", false);
        let steps = plan(&pr, &origin_only(), &CheckoutOptions::default(), false).unwrap();
        assert_eq!(
            steps,
            vec![
                "git fetch origin +refs/heads/feature:refs/remotes/origin/feature --no-tags",
                "git worktree add -b feature /src/project-pr42 origin/feature",
                "git -C /src/project-pr42 config branch.feature.remote origin",
                "git -C /src/project-pr42 config branch.feature.merge refs/heads/feature",
            ]
        );
    }

    #[test]
    fn test_existing_local_branch_fast_forwards() {
        let pr = pr(Some("acme"), "feature", false);
        let steps = plan(&pr, &origin_only(), &CheckoutOptions::default(), true).unwrap();
        assert_eq!(steps[1], "git worktree add /src/project-pr42 feature");
        assert_eq!(
            steps[2],
            "git -C /src/project-pr42 merge --ff-only refs/remotes/origin/feature"
        );
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_existing_local_branch_force_resets() {
        let pr = pr(Some("acme"), "feature", false);
        let options = CheckoutOptions {
            force: true,
            ..Default::default()
        };
        let steps = plan(&pr, &origin_only(), &options, true).unwrap();
        assert_eq!(steps[1], "git worktree add --force /src/project-pr42 feature");
        assert_eq!(
            steps[2],
            "git -C /src/project-pr42 reset --hard refs/remotes/origin/feature"
        );
    }

    #[test]
    fn test_detach_with_head_remote() {
        let pr = pr(Some("acme"), "feature", false);
        let options = CheckoutOptions {
            detach: true,
            ..Default::default()
        };
        let steps = plan(&pr, &origin_only(), &options, true).unwrap();
        assert_eq!(
            steps,
            vec![
                "git fetch origin +refs/heads/feature --no-tags",
                "git worktree add --detach /src/project-pr42 FETCH_HEAD",
            ]
        );
    }

    #[test]
    fn test_fork_with_configured_remote() {
        let remotes = vec![
            remote("origin", "https://github.com/acme/project.git"),
            remote("alice", "git@github.com:alice/project.git"),
        ];
        let pr = pr(Some("alice"), "fix-typo", true);
        let steps = plan(&pr, &remotes, &CheckoutOptions::default(), false).unwrap();
        assert_eq!(
            steps[0],
            "git fetch alice +refs/heads/fix-typo:refs/remotes/alice/fix-typo --no-tags"
        );
        assert_eq!(
            steps[1],
            "git worktree add -b fix-typo /src/project-pr42 alice/fix-typo"
        );
    }

    #[test]
    fn test_fork_without_remote_uses_pull_ref() {
        let pr = pr(Some("alice"), "fix-typo", false);
        let steps = plan(&pr, &origin_only(), &CheckoutOptions::default(), false).unwrap();
        assert_eq!(
            steps,
            vec![
                "git fetch origin refs/pull/42/head:fix-typo --no-tags",
                "git worktree add /src/project-pr42 fix-typo",
                "git -C /src/project-pr42 config branch.fix-typo.remote origin",
                "git -C /src/project-pr42 config branch.fix-typo.merge refs/pull/42/head",
            ]
        );
    }

    #[test]
    fn test_fork_maintainer_can_modify_sets_push_remote() {
        let pr = pr(Some("alice"), "fix-typo", true);
        let options = CheckoutOptions {
            force: true,
            ..Default::default()
        };
        let steps = plan(&pr, &origin_only(), &options, false).unwrap();
        assert_eq!(
            steps,
            vec![
                "git fetch origin refs/pull/42/head:fix-typo --no-tags --force",
                "git worktree add /src/project-pr42 fix-typo",
                "git -C /src/project-pr42 config branch.fix-typo.pushRemote https://github.com/alice/project",
                "git -C /src/project-pr42 config branch.fix-typo.remote origin",
                "git -C /src/project-pr42 config branch.fix-typo.merge refs/heads/fix-typo",
            ]
        );
    }

    #[test]
    fn test_deleted_fork_never_matches_a_remote() {
        let pr = pr(None, "patch-1", true);
        let topology = Topology {
            remotes: &origin_only(),
            repo_owner: "acme",
            local_branch_exists: false,
        };
        let plan = plan_pr_checkout(&pr, topology, &CheckoutOptions::default(), Path::new(PATH))
            .unwrap();
        assert_eq!(plan.head_remote, None);
        let steps: Vec<String> = plan.steps.iter().map(ToString::to_string).collect();
        assert_eq!(steps[0], "git fetch origin refs/pull/42/head:patch-1 --no-tags");
        assert!(!steps.iter().any(|s| s.contains("pushRemote")));
    }

    #[test]
    fn test_detach_without_head_remote() {
        let pr = pr(Some("alice"), "fix-typo", false);
        let options = CheckoutOptions {
            detach: true,
            ..Default::default()
        };
        let steps = plan(&pr, &origin_only(), &options, false).unwrap();
        assert_eq!(
            steps,
            vec![
                "git fetch origin refs/pull/42/head --no-tags",
                "git worktree add --detach /src/project-pr42 FETCH_HEAD",
            ]
        );
    }

    #[test]
    fn test_custom_branch_name_and_submodules() {
        let pr = pr(Some("acme"), "feature", false);
        let options = CheckoutOptions {
            branch_name: Some("review/feature".to_string()),
            recurse_submodules: true,
            ..Default::default()
        };
        let steps = plan(&pr, &origin_only(), &options, false).unwrap();
        assert_eq!(
            steps[1],
            "git worktree add -b review/feature /src/project-pr42 origin/feature"
        );
        assert_eq!(
            &steps[steps.len() - 2..],
            &[
                "git -C /src/project-pr42 submodule sync --recursive".to_string(),
                "git -C /src/project-pr42 submodule update --init --recursive".to_string(),
            ]
        );
    }

    #[test]
    fn test_hostile_head_ref_rejected_before_any_command() {
        let pr = pr(Some("acme"), "x;rm -rf ~", false);
        assert!(plan(&pr, &origin_only(), &CheckoutOptions::default(), false).is_err());
        let fork = self::pr(Some("alice"), "--upload-pack=evil", false);
        assert!(plan(&fork, &origin_only(), &CheckoutOptions::default(), false).is_err());
    }

    #[test]
    fn test_branch_worktree_plans() {
        let path = Path::new("/src/project-feature-x");
        let local = plan_branch_worktree("feature/x", path, Some("origin"), true, true).unwrap();
        assert_eq!(
            local[0].to_string(),
            "git worktree add /src/project-feature-x feature/x"
        );

        let tracked = plan_branch_worktree("feature/x", path, Some("origin"), false, true).unwrap();
        assert_eq!(
            tracked[0].to_string(),
            "git worktree add -b feature/x /src/project-feature-x origin/feature/x"
        );
        assert_eq!(tracked.len(), 3);

        let fresh = plan_branch_worktree("feature/x", path, None, false, false).unwrap();
        assert_eq!(
            fresh[0].to_string(),
            "git worktree add -b feature/x /src/project-feature-x HEAD"
        );
        assert!(plan_branch_worktree("bad name", path, None, false, false).is_err());
    }
}
