use super::{current_repo, open_repository, repo_override};
use crate::{
    core::worktree::promote::{promote, PromoteParams},
    core::worktree::Registry,
    git::RepoGateway,
    github::{GhCli, PullRequestSource},
    output::{CliOutput, Output, OutputConfig},
    selector::parse_pr_selector,
    validate::validate_branch_name,
};
use anyhow::{Context, Result};

#[derive(clap::Args)]
#[command(about = "Mark a branch worktree as the worktree of a pull request")]
#[command(long_about = r#"
After opening a pull request for a branch that already has a branch worktree,
promote records the PR number and title on the branch so the worktree shows
up in `pr list`, `pr switch` and `pr remove`.

The title is fetched from GitHub unless --title is given.
"#)]
pub struct Args {
    #[arg(help = "Branch checked out in the branch worktree")]
    pub branch: String,

    #[arg(help = "PR number or URL")]
    pub number: String,

    #[arg(long, help = "PR title to record instead of fetching it")]
    pub title: Option<String>,

    #[arg(short, long, help = "Be verbose; show detailed progress")]
    pub verbose: bool,
}

pub fn run(args: Args) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(false, args.verbose));
    let git = open_repository(false)?;
    let override_repo = repo_override();
    run_promote(&args, &git, &GhCli::new(), override_repo.as_deref(), &mut output)
}

fn run_promote<G: RepoGateway>(
    args: &Args,
    gateway: &G,
    source: &dyn PullRequestSource,
    override_repo: Option<&str>,
    output: &mut dyn Output,
) -> Result<()> {
    validate_branch_name(&args.branch)?;
    let number = parse_pr_selector(&args.number)?;

    let registry = Registry::open(gateway)?;
    let worktree = registry
        .branch_worktrees()?
        .into_iter()
        .find(|wt| wt.branch.as_deref() == Some(args.branch.as_str()))
        .with_context(|| format!("No branch worktree found for branch '{}'", args.branch))?;

    let title = match &args.title {
        Some(title) => title.clone(),
        None => {
            let repo = current_repo(gateway, override_repo)?;
            output.step(&format!("Fetching title of PR #{number} from {repo}"));
            source.fetch(&repo, number)?.title
        }
    };

    promote(
        gateway,
        registry.root(),
        &PromoteParams {
            branch: &args.branch,
            number,
            title: &title,
        },
    )?;

    output.result(&format!(
        "Promoted {} to the worktree for #{number}",
        worktree.path.display()
    ));
    if !title.is_empty() {
        output.detail("Title", &title);
    }
    Ok(())
}
