//! Core logic for creating PR and branch worktrees.

use super::paths::{branch_worktree_path, pr_worktree_path};
use super::synth::{
    local_branch_name, plan_branch_worktree, plan_pr_checkout, select_base_remote,
    CheckoutOptions, Topology,
};
use crate::core::metadata::{BranchMetadata, WorktreeType};
use crate::core::{HookOutcome, HookRunner, ProgressSink};
use crate::git::{GitInvocation, RepoGateway};
use crate::github::{PullRequest, RepoRef};
use crate::hooks::SetupContext;
use crate::validate::{validate_branch_name, PrNumber};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Input parameters for PR checkout.
pub struct PrCheckoutParams<'a> {
    pub pr: &'a PullRequest,
    /// Repository the PR belongs to.
    pub repo: &'a RepoRef,
    pub options: CheckoutOptions,
}

/// Input parameters for a branch worktree.
pub struct BranchWorktreeParams<'a> {
    pub branch: &'a str,
    pub shell_mode: bool,
}

/// Result of a create operation.
#[derive(Debug, Clone)]
pub struct CreateResult {
    pub worktree_path: PathBuf,
    /// `None` for detached checkouts.
    pub branch_name: Option<String>,
    pub pr_number: Option<PrNumber>,
    pub title: Option<String>,
    /// `None` when setup could not be started at all.
    pub setup: Option<HookOutcome>,
}

fn ensure_free(path: &Path, what: &str) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Worktree for {what} already exists at {}", path.display());
    }
    Ok(())
}

fn run_steps<G: RepoGateway + ?Sized>(
    gateway: &G,
    steps: &[GitInvocation],
    sink: &mut impl ProgressSink,
) -> Result<()> {
    for step in steps {
        sink.on_debug(&step.to_string());
    }
    gateway.run_batch(steps)
}

fn run_setup(ctx: &SetupContext, sink: &mut (impl ProgressSink + HookRunner)) -> Option<HookOutcome> {
    match sink.run_setup(ctx) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            sink.on_warning(&format!("Post-creation setup failed: {e:#}"));
            None
        }
    }
}

/// Checks out a PR into `<parent>/<repo>-pr<number>`.
///
/// Validation and topology errors abort before any git command runs. A
/// failing git command aborts the batch and leaves whatever it created in
/// place. Metadata is only written once every command succeeded.
pub fn create_pr_worktree<G: RepoGateway + ?Sized>(
    params: &PrCheckoutParams<'_>,
    gateway: &G,
    sink: &mut (impl ProgressSink + HookRunner),
) -> Result<CreateResult> {
    let pr = params.pr;
    let options = &params.options;
    let number = pr.pr_number()?;

    let root = gateway.resolve_root()?;
    let worktree_path = pr_worktree_path(&root, number)?;
    ensure_free(&worktree_path, &format!("PR #{number}"))?;

    let remotes = gateway.list_remotes().context("Failed to list remotes")?;
    let branch = local_branch_name(pr, options);
    validate_branch_name(&branch).context("Invalid local branch")?;
    let local_branch_exists = !options.detach && gateway.branch_exists(&branch)?;

    let plan = plan_pr_checkout(
        pr,
        Topology {
            remotes: &remotes,
            repo_owner: &params.repo.owner,
            local_branch_exists,
        },
        options,
        &worktree_path,
    )?;

    sink.on_step(&format!(
        "Checking out PR #{number} ({}) from {} into {}",
        pr.head_ref(),
        plan.head_remote.as_deref().unwrap_or(&plan.base_remote),
        worktree_path.display()
    ));
    run_steps(gateway, &plan.steps, sink)
        .with_context(|| format!("Failed to create worktree for PR #{number}"))?;

    let branch_name = if options.detach {
        None
    } else {
        let meta = BranchMetadata::new(gateway, &root);
        meta.set_pr(&plan.branch_name, number, &pr.title)
            .and_then(|()| meta.set_type(&plan.branch_name, WorktreeType::Pr))
            .with_context(|| {
                format!(
                    "Worktree created at {} but storing PR metadata failed",
                    worktree_path.display()
                )
            })?;
        Some(plan.branch_name)
    };

    let ctx = SetupContext::new(worktree_path.clone(), root)
        .with_stdout_to_stderr(options.shell_mode);
    let setup = run_setup(&ctx, sink);

    Ok(CreateResult {
        worktree_path,
        branch_name,
        pr_number: Some(number),
        title: Some(pr.title.clone()),
        setup,
    })
}

/// Creates `<parent>/<repo>-<normalized branch>` for a plain branch.
///
/// Uses the local branch if it exists, else the base remote's branch, else
/// starts a new branch at `HEAD`.
pub fn create_branch_worktree<G: RepoGateway + ?Sized>(
    params: &BranchWorktreeParams<'_>,
    gateway: &G,
    sink: &mut (impl ProgressSink + HookRunner),
) -> Result<CreateResult> {
    let branch = params.branch;
    validate_branch_name(branch)?;

    let root = gateway.resolve_root()?;
    let worktree_path = branch_worktree_path(&root, branch)?;
    ensure_free(&worktree_path, &format!("branch '{branch}'"))?;

    let remotes = gateway.list_remotes().context("Failed to list remotes")?;
    let base = select_base_remote(&remotes).ok().map(|r| r.name.as_str());
    let local_exists = gateway.branch_exists(branch)?;
    let remote_exists = match base {
        Some(remote) if !local_exists => {
            gateway.ref_exists(&format!("refs/remotes/{remote}/{branch}"))?
        }
        _ => false,
    };

    let steps = plan_branch_worktree(branch, &worktree_path, base, local_exists, remote_exists)?;
    sink.on_step(&format!(
        "Creating worktree for branch '{branch}' at {}",
        worktree_path.display()
    ));
    run_steps(gateway, &steps, sink)
        .with_context(|| format!("Failed to create worktree for branch '{branch}'"))?;

    BranchMetadata::new(gateway, &root)
        .set_type(branch, WorktreeType::Branch)
        .context("Worktree created but storing its type failed")?;

    let ctx = SetupContext::new(worktree_path.clone(), root)
        .with_stdout_to_stderr(params.shell_mode);
    let setup = run_setup(&ctx, sink);

    Ok(CreateResult {
        worktree_path,
        branch_name: Some(branch.to_string()),
        pr_number: None,
        title: None,
        setup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NoopHookRunner;
    use crate::git::fake::FakeGateway;
    use crate::github::{BaseRepo, HeadRepo, PullRequestBase, PullRequestHead, RepoOwner};

    const ROOT: &str = "/nonexistent/src/project";

    fn sample_pr() -> PullRequest {
        PullRequest {
            number: 7,
            title: "Add `cache` layer; faster".to_string(),
            head: PullRequestHead {
                ref_name: "cache-layer".to_string(),
                repo: Some(HeadRepo {
                    name: "project".to_string(),
                    owner: RepoOwner {
                        login: "acme".to_string(),
                    },
                }),
            },
            base: PullRequestBase {
                repo: BaseRepo {
                    full_name: "acme/project".to_string(),
                },
            },
            maintainer_can_modify: false,
        }
    }

    fn repo() -> RepoRef {
        RepoRef::new("acme", "project").unwrap()
    }

    #[test]
    fn test_pr_checkout_runs_batch_then_stores_metadata() {
        let gw = FakeGateway::new(ROOT).with_remote("origin", "https://github.com/acme/project.git");
        let pr = sample_pr();
        let repo = repo();
        let params = PrCheckoutParams {
            pr: &pr,
            repo: &repo,
            options: CheckoutOptions::default(),
        };

        let result = create_pr_worktree(&params, &gw, &mut NoopHookRunner).unwrap();

        assert_eq!(
            result.worktree_path,
            PathBuf::from("/nonexistent/src/project-pr7")
        );
        assert_eq!(result.branch_name.as_deref(), Some("cache-layer"));
        assert_eq!(gw.batches.borrow().len(), 1);
        assert_eq!(
            gw.last_batch()[1],
            "git worktree add -b cache-layer /nonexistent/src/project-pr7 origin/cache-layer"
        );

        let root = Path::new(ROOT);
        assert_eq!(
            gw.config_value(root, "branch.cache-layer.gh-worktree-pr-number"),
            Some("7".to_string())
        );
        assert_eq!(
            gw.config_value(root, "branch.cache-layer.gh-worktree-pr-title"),
            Some("Add cache layer faster".to_string())
        );
        assert_eq!(
            gw.config_value(root, "branch.cache-layer.gh-worktree-type"),
            Some("pr".to_string())
        );
    }

    #[test]
    fn test_metadata_keyed_by_custom_branch_name() {
        let gw = FakeGateway::new(ROOT).with_remote("origin", "https://github.com/acme/project.git");
        let pr = sample_pr();
        let repo = repo();
        let params = PrCheckoutParams {
            pr: &pr,
            repo: &repo,
            options: CheckoutOptions {
                branch_name: Some("review-7".to_string()),
                ..Default::default()
            },
        };

        create_pr_worktree(&params, &gw, &mut NoopHookRunner).unwrap();
        assert_eq!(
            gw.config_value(Path::new(ROOT), "branch.review-7.gh-worktree-pr-number"),
            Some("7".to_string())
        );
        assert_eq!(
            gw.config_value(Path::new(ROOT), "branch.cache-layer.gh-worktree-pr-number"),
            None
        );
    }

    #[test]
    fn test_failed_batch_writes_no_metadata() {
        let mut gw =
            FakeGateway::new(ROOT).with_remote("origin", "https://github.com/acme/project.git");
        gw.fail_batch = true;
        let pr = sample_pr();
        let repo = repo();
        let params = PrCheckoutParams {
            pr: &pr,
            repo: &repo,
            options: CheckoutOptions::default(),
        };

        let err = create_pr_worktree(&params, &gw, &mut NoopHookRunner).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to create worktree for PR #7"));
        assert!(gw.config.borrow().is_empty());
    }

    #[test]
    fn test_no_remotes_runs_nothing() {
        let gw = FakeGateway::new(ROOT);
        let pr = sample_pr();
        let repo = repo();
        let params = PrCheckoutParams {
            pr: &pr,
            repo: &repo,
            options: CheckoutOptions::default(),
        };

        assert!(create_pr_worktree(&params, &gw, &mut NoopHookRunner).is_err());
        assert!(gw.batches.borrow().is_empty());
    }

    #[test]
    fn test_detached_checkout_skips_metadata() {
        let gw = FakeGateway::new(ROOT).with_remote("origin", "https://github.com/acme/project.git");
        let pr = sample_pr();
        let repo = repo();
        let params = PrCheckoutParams {
            pr: &pr,
            repo: &repo,
            options: CheckoutOptions {
                detach: true,
                ..Default::default()
            },
        };

        let result = create_pr_worktree(&params, &gw, &mut NoopHookRunner).unwrap();
        assert_eq!(result.branch_name, None);
        assert!(gw.config.borrow().is_empty());
    }

    #[test]
    fn test_branch_worktree_tracks_remote_branch() {
        let gw = FakeGateway::new(ROOT)
            .with_remote("origin", "https://github.com/acme/project.git")
            .with_ref("refs/remotes/origin/feature/x");
        let params = BranchWorktreeParams {
            branch: "feature/x",
            shell_mode: false,
        };

        let result = create_branch_worktree(&params, &gw, &mut NoopHookRunner).unwrap();
        assert_eq!(
            result.worktree_path,
            PathBuf::from("/nonexistent/src/project-feature-x")
        );
        assert_eq!(
            gw.last_batch()[0],
            "git worktree add -b feature/x /nonexistent/src/project-feature-x origin/feature/x"
        );
        assert_eq!(
            gw.config_value(Path::new(ROOT), "branch.feature/x.gh-worktree-type"),
            Some("branch".to_string())
        );
    }

    #[test]
    fn test_branch_worktree_without_remotes_starts_from_head() {
        let gw = FakeGateway::new(ROOT);
        let params = BranchWorktreeParams {
            branch: "spike",
            shell_mode: false,
        };
        create_branch_worktree(&params, &gw, &mut NoopHookRunner).unwrap();
        assert_eq!(
            gw.last_batch(),
            vec!["git worktree add -b spike /nonexistent/src/project-spike HEAD"]
        );
    }
}
