//! Interactive pickers rendered on stderr.
//!
//! Prompts never touch stdout, so `$(gh worktree pr switch --shell)` only
//! captures the selected path.

use super::ensure_selector_repo;
use crate::core::worktree::{Registry, WorktreeDescriptor};
use crate::git::RepoGateway;
use crate::selector::Selector;
use anyhow::{Context, Result};
use console::Term;
use dialoguer::{theme::ColorfulTheme, Select};

/// Shows `items` and returns the chosen index, `None` when cancelled.
pub fn pick(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    let term = Term::stderr();
    if !term.is_term() {
        anyhow::bail!("Interactive selection needs a terminal; pass a PR number, URL or branch");
    }

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_on_opt(&term)
        .context("Interactive selection failed")
}

/// Picker label for a managed worktree: `#<n>\t<branch>\t<title>`.
pub fn worktree_label(worktree: &WorktreeDescriptor) -> String {
    format!(
        "{}\t{}\t{}",
        worktree.label(),
        worktree.branch.as_deref().unwrap_or("(detached)"),
        worktree.title_or_placeholder()
    )
}

/// The worktree a `remove` or `switch` invocation operates on.
pub enum Target {
    Worktree(WorktreeDescriptor),
    /// Nothing to operate on; the message is shown and the command succeeds.
    Nothing(String),
}

/// Resolves `selector` against the registry, or asks the user to pick one
/// of the managed worktrees when no selector is given.
pub fn choose_worktree<G: RepoGateway + ?Sized>(
    registry: &Registry<'_, G>,
    gateway: &G,
    selector: Option<&str>,
    include_branches: bool,
    prompt: &str,
) -> Result<Target> {
    if let Some(raw) = selector {
        let selector = Selector::parse(raw)?;
        ensure_selector_repo(&selector, gateway, super::repo_override().as_deref())?;
        return Ok(match registry.find(&selector)? {
            Some(wt) => Target::Worktree(wt),
            None => Target::Nothing(format!("Worktree for {selector} not found.")),
        });
    }

    let candidates = registry.managed(include_branches)?;
    if candidates.is_empty() {
        let what = if include_branches { "" } else { "PR " };
        return Ok(Target::Nothing(format!("No {what}worktrees found.")));
    }

    let labels: Vec<String> = candidates.iter().map(worktree_label).collect();
    Ok(match pick(prompt, &labels)? {
        Some(index) => Target::Worktree(candidates[index].clone()),
        None => Target::Nothing("Cancelled.".to_string()),
    })
}
