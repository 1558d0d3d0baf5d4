use super::{
    open_repository,
    select::{choose_worktree, Target},
};
use crate::{
    core::{
        worktree::remove::{remove_worktree, RemoveParams},
        worktree::Registry,
        OutputSink,
    },
    git::RepoGateway,
    output::{CliOutput, Output, OutputConfig},
    settings::WorktreeSettings,
};
use anyhow::Result;

#[derive(clap::Args)]
#[command(about = "Remove a pull request worktree")]
#[command(long_about = r#"
Removes a PR worktree and deletes its local branch, which also drops the PR
metadata stored for the branch. The worktree can be given as a PR number, PR
URL, branch name or directory name; without one, it is picked interactively.

Deleting the branch is skipped with --keep-branch or when
gh-worktree.deleteBranch is false. A failure to delete it is only a warning.
"#)]
pub struct Args {
    #[arg(help = "PR number, PR URL, branch or directory name")]
    pub selector: Option<String>,

    #[arg(long, help = "Remove the worktree even if it has local changes")]
    pub force: bool,

    #[arg(long, help = "Keep the local branch")]
    pub keep_branch: bool,

    #[arg(long, help = "Offer branch worktrees in the interactive picker too")]
    pub all: bool,

    #[arg(short, long, help = "Be verbose; show detailed progress")]
    pub verbose: bool,
}

pub fn run(args: Args) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(false, args.verbose));
    let git = open_repository(false)?;
    let settings = WorktreeSettings::load()?;
    run_remove(&args, &git, &settings, &mut output)
}

fn run_remove<G: RepoGateway>(
    args: &Args,
    gateway: &G,
    settings: &WorktreeSettings,
    output: &mut dyn Output,
) -> Result<()> {
    let registry = Registry::open(gateway)?;
    let worktree = match choose_worktree(
        &registry,
        gateway,
        args.selector.as_deref(),
        args.all,
        "Select a worktree to remove",
    )? {
        Target::Worktree(wt) => wt,
        Target::Nothing(msg) => {
            output.info(&msg);
            return Ok(());
        }
    };

    let params = RemoveParams {
        force: args.force,
        delete_branch: settings.delete_branch && !args.keep_branch,
    };
    let result = remove_worktree(
        gateway,
        registry.root(),
        &worktree,
        params,
        &mut OutputSink(output),
    )?;

    output.result(&format!(
        "Removed worktree for {} at {}",
        worktree.label(),
        result.path.display()
    ));
    if let Some(title) = result.title.as_deref().filter(|t| !t.is_empty()) {
        output.detail("Title", title);
    }
    if result.branch_deleted {
        if let Some(branch) = &result.branch {
            output.step(&format!("Deleted branch '{branch}'"));
        }
    }
    Ok(())
}
