use super::{current_repo, open_repository, relative_to_cwd, repo_override, select};
use crate::{
    core::{
        worktree::create::{
            create_branch_worktree, create_pr_worktree, BranchWorktreeParams, CreateResult,
            PrCheckoutParams,
        },
        worktree::CheckoutOptions,
        CommandBridge,
    },
    git::RepoGateway,
    github::{GhCli, PullRequest, PullRequestSource, RepoRef},
    output::{CliOutput, Output, OutputConfig},
    selector::Selector,
    settings::WorktreeSettings,
};
use anyhow::{Context, Result};

#[derive(clap::Args)]
#[command(about = "Check out a pull request or branch in a new git worktree")]
#[command(long_about = r#"
Creates a worktree next to the main checkout and checks the pull request out
into it as a tracked local branch:

  gh worktree pr checkout 32
  gh worktree pr checkout https://github.com/OWNER/REPO/pull/32

PRs from forks are fetched through a configured remote for the fork when one
exists, otherwise through refs/pull/<number>/head. When the author allows
maintainer edits, pushing goes straight to the fork.

Any other argument is taken as a branch name and gets a branch worktree at
<repo>-<branch>. Without an argument, an open PR is picked interactively.

If .gh-worktree.yml exists in the main worktree, its setup.run commands are
executed in the new worktree.
"#)]
pub struct Args {
    #[arg(help = "PR number, PR URL or branch name")]
    pub selector: Option<String>,

    #[arg(long, help = "Update all submodules after checkout")]
    pub recurse_submodules: bool,

    #[arg(
        short,
        long,
        help = "Reset the existing local branch to the latest state of the pull request"
    )]
    pub force: bool,

    #[arg(long, help = "Check out the PR with a detached HEAD")]
    pub detach: bool,

    #[arg(
        short = 'b',
        long = "branch",
        value_name = "NAME",
        help = "Local branch name to use (default: the PR head branch)"
    )]
    pub branch: Option<String>,

    #[arg(short, long, help = "Print only the worktree path, for shell functions")]
    pub shell: bool,

    #[arg(long, help = "Do not run setup commands from .gh-worktree.yml")]
    pub no_setup: bool,

    #[arg(short, long, help = "Be verbose; show detailed progress")]
    pub verbose: bool,
}

pub fn run(args: Args) -> Result<()> {
    let mut output = if args.shell {
        CliOutput::shell(args.verbose)
    } else {
        CliOutput::new(OutputConfig::new(false, args.verbose))
    };

    let git = open_repository(args.shell)?;
    let settings = WorktreeSettings::load()?;
    let override_repo = repo_override();

    run_checkout(
        &args,
        &git,
        &GhCli::new(),
        &settings,
        override_repo.as_deref(),
        &mut output,
    )
}

fn run_checkout<G: RepoGateway>(
    args: &Args,
    gateway: &G,
    source: &dyn PullRequestSource,
    settings: &WorktreeSettings,
    override_repo: Option<&str>,
    output: &mut dyn Output,
) -> Result<()> {
    // Selector problems are reported before anything touches git or the network.
    let selector = args.selector.as_deref().map(Selector::parse).transpose()?;

    match selector {
        Some(Selector::Branch(branch)) => {
            if args.detach || args.branch.is_some() {
                anyhow::bail!("--detach and --branch only apply to pull requests");
            }
            let result = {
                let mut bridge = CommandBridge::new(output, run_setup(args, settings));
                let params = BranchWorktreeParams {
                    branch: &branch,
                    shell_mode: args.shell,
                };
                create_branch_worktree(&params, gateway, &mut bridge)?
            };
            report(&result, &format!("branch '{branch}'"), output);
            Ok(())
        }
        Some(Selector::Pr { number, repo: url_repo }) => {
            let repo = current_repo(gateway, override_repo)?;
            if let Some(url_repo) = url_repo {
                if !url_repo.same_repo(&repo) {
                    anyhow::bail!(
                        "PR URL points at {url_repo}, but the current repository is {repo}"
                    );
                }
            }
            let pr = source.fetch(&repo, number)?;
            checkout_pr(args, gateway, &pr, &repo, settings, output)
        }
        None => {
            let repo = current_repo(gateway, override_repo)?;
            let prs = source.list_open(&repo)?;
            if prs.is_empty() {
                output.info("No open pull requests found.");
                return Ok(());
            }
            let labels: Vec<String> = prs.iter().map(PullRequest::picker_label).collect();
            match select::pick("Select a pull request to check out", &labels)? {
                Some(index) => checkout_pr(args, gateway, &prs[index], &repo, settings, output),
                None => {
                    output.info("Cancelled.");
                    Ok(())
                }
            }
        }
    }
}

fn run_setup(args: &Args, settings: &WorktreeSettings) -> bool {
    settings.run_setup && !args.no_setup
}

fn checkout_pr<G: RepoGateway>(
    args: &Args,
    gateway: &G,
    pr: &PullRequest,
    repo: &RepoRef,
    settings: &WorktreeSettings,
    output: &mut dyn Output,
) -> Result<()> {
    let options = CheckoutOptions {
        recurse_submodules: args.recurse_submodules || settings.recurse_submodules,
        force: args.force,
        detach: args.detach,
        branch_name: args.branch.clone(),
        shell_mode: args.shell,
    };

    let result = {
        let mut bridge = CommandBridge::new(output, run_setup(args, settings));
        let params = PrCheckoutParams { pr, repo, options };
        create_pr_worktree(&params, gateway, &mut bridge)
            .with_context(|| format!("Failed to check out PR #{}", pr.number))?
    };

    report(&result, &format!("#{}", pr.number), output);
    Ok(())
}

fn report(result: &CreateResult, what: &str, output: &mut dyn Output) {
    if output.is_quiet() {
        output.shell_path(&relative_to_cwd(&result.worktree_path));
        return;
    }

    output.result(&format!(
        "Created worktree for {what} at {}",
        result.worktree_path.display()
    ));
    if let Some(title) = result.title.as_deref().filter(|t| !t.is_empty()) {
        output.detail("Title", title);
    }
    if let Some(setup) = &result.setup {
        if !setup.success {
            output.warning("Some setup commands failed; the worktree was still created");
        }
    }
}
