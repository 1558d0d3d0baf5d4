//! Command modules for gh-worktree.
//!
//! The binary is invoked by `gh` as `gh-worktree <args>`, so the whole
//! surface is one clap tree rooted at [`Cli`]. Each module owns the `Args`
//! of one subcommand and a `run` entry point.

pub mod checkout;
pub mod completions;
pub mod list;
pub mod promote;
pub mod remove;
pub mod select;
pub mod shell_init;
pub mod switch;

use crate::core::worktree::paths::display_relative;
use crate::git::{GitCommand, RepoGateway};
use crate::github::{resolve_current_repo, RepoRef};
use crate::selector::Selector;
use crate::REPO_OVERRIDE_ENV;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gh-worktree")]
#[command(version = crate::VERSION)]
#[command(about = "Check out pull requests and branches into dedicated git worktrees")]
#[command(long_about = r#"
A gh extension that gives every pull request its own git worktree, placed next
to the main checkout:

  ~/src/project          main worktree
  ~/src/project-pr123    gh worktree pr checkout 123
  ~/src/project-feat-x   gh worktree pr checkout feat/x

Run `gh worktree shell-init` to get a `ghws` function that switches into a
worktree with `cd`.
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: TopCommand,
}

#[derive(Subcommand)]
pub enum TopCommand {
    /// Operations on pull request worktrees
    #[command(subcommand)]
    Pr(PrCommand),
    /// Print shell functions that cd into worktrees
    ShellInit(shell_init::Args),
    /// Generate shell completion scripts
    Completions(completions::Args),
}

#[derive(Subcommand)]
pub enum PrCommand {
    /// Check out a pull request or branch in a new worktree
    Checkout(checkout::Args),
    /// List pull request worktrees
    List(list::Args),
    /// Remove a pull request worktree
    Remove(remove::Args),
    /// Print the path of an existing pull request worktree
    Switch(switch::Args),
    /// Mark a branch worktree as the worktree of a pull request
    Promote(promote::Args),
}

impl Cli {
    pub fn verbose(&self) -> bool {
        match &self.command {
            TopCommand::Pr(PrCommand::Checkout(a)) => a.verbose,
            TopCommand::Pr(PrCommand::List(a)) => a.verbose,
            TopCommand::Pr(PrCommand::Remove(a)) => a.verbose,
            TopCommand::Pr(PrCommand::Switch(a)) => a.verbose,
            TopCommand::Pr(PrCommand::Promote(a)) => a.verbose,
            TopCommand::ShellInit(_) | TopCommand::Completions(_) => false,
        }
    }

    /// Whether stdout is reserved for a path consumed by a shell function.
    pub fn shell_mode(&self) -> bool {
        match &self.command {
            TopCommand::Pr(PrCommand::Checkout(a)) => a.shell,
            TopCommand::Pr(PrCommand::Switch(a)) => a.shell,
            _ => false,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        TopCommand::Pr(PrCommand::Checkout(args)) => checkout::run(args),
        TopCommand::Pr(PrCommand::List(args)) => list::run(args),
        TopCommand::Pr(PrCommand::Remove(args)) => remove::run(args),
        TopCommand::Pr(PrCommand::Switch(args)) => switch::run(args),
        TopCommand::Pr(PrCommand::Promote(args)) => promote::run(args),
        TopCommand::ShellInit(args) => shell_init::run(args),
        TopCommand::Completions(args) => completions::run(args),
    }
}

/// Git access for the repository containing the current directory.
pub(crate) fn open_repository(quiet: bool) -> Result<GitCommand> {
    let git = GitCommand::new(quiet);
    if !git.is_inside_work_tree()? {
        anyhow::bail!("Not inside a Git repository");
    }
    Ok(git)
}

/// `OWNER/REPO` from `GH_REPO`, when set.
pub(crate) fn repo_override() -> Option<String> {
    std::env::var(REPO_OVERRIDE_ENV)
        .ok()
        .filter(|r| !r.trim().is_empty())
}

/// The GitHub repository PRs are looked up in.
pub(crate) fn current_repo<G: RepoGateway + ?Sized>(
    gateway: &G,
    override_repo: Option<&str>,
) -> Result<RepoRef> {
    let remotes = gateway.list_remotes().context("Failed to list remotes")?;
    resolve_current_repo(&remotes, override_repo)
}

/// Rejects a URL selector that names a repository other than the current one.
///
/// Skipped when the current repository cannot be determined, since lookups
/// in the registry do not need it.
pub(crate) fn ensure_selector_repo<G: RepoGateway + ?Sized>(
    selector: &Selector,
    gateway: &G,
    override_repo: Option<&str>,
) -> Result<()> {
    let Selector::Pr {
        repo: Some(url_repo),
        ..
    } = selector
    else {
        return Ok(());
    };
    match current_repo(gateway, override_repo) {
        Ok(repo) if !url_repo.same_repo(&repo) => {
            anyhow::bail!("PR URL points at {url_repo}, but the current repository is {repo}")
        }
        _ => Ok(()),
    }
}

/// `path` relative to the current directory, for display and `cd`.
pub(crate) fn relative_to_cwd(path: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => display_relative(path, &cwd),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_shell_mode_flag() {
        let cli = Cli::try_parse_from(["gh-worktree", "pr", "switch", "--shell", "12"]).unwrap();
        assert!(cli.shell_mode());
        assert!(!cli.verbose());

        let cli = Cli::try_parse_from(["gh-worktree", "pr", "list", "-v"]).unwrap();
        assert!(!cli.shell_mode());
        assert!(cli.verbose());
    }

    #[test]
    fn test_checkout_flags() {
        let cli = Cli::try_parse_from([
            "gh-worktree",
            "pr",
            "checkout",
            "42",
            "--recurse-submodules",
            "-f",
            "-b",
            "review",
        ])
        .unwrap();
        match cli.command {
            TopCommand::Pr(PrCommand::Checkout(args)) => {
                assert_eq!(args.selector.as_deref(), Some("42"));
                assert!(args.recurse_submodules);
                assert!(args.force);
                assert_eq!(args.branch.as_deref(), Some("review"));
            }
            _ => panic!("expected checkout"),
        }
    }

    #[test]
    fn test_promote_requires_number() {
        assert!(Cli::try_parse_from(["gh-worktree", "pr", "promote", "feature-x"]).is_err());
    }
}
