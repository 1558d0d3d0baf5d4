//! Shell functions that `cd` into worktrees.
//!
//! A subprocess cannot change its parent's directory, so `switch --shell`
//! and `checkout --shell` print a path and these wrappers do the `cd`.
//!
//! ```bash
//! eval "$(gh worktree shell-init bash)"   # ~/.bashrc or ~/.zshrc
//! gh worktree shell-init fish | source    # ~/.config/fish/config.fish
//! ```

use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
}

#[derive(clap::Args)]
#[command(about = "Print shell functions for switching into worktrees")]
#[command(long_about = r#"
Prints two shell functions:

  ghws [<number>|<url>|<branch>]   cd into an existing PR worktree
  ghwc [<number>|<url>|<branch>]   check out a PR and cd into its worktree

Add to ~/.bashrc or ~/.zshrc:
  eval "$(gh worktree shell-init bash)"

Add to ~/.config/fish/config.fish:
  gh worktree shell-init fish | source
"#)]
pub struct Args {
    #[arg(value_enum, default_value = "bash", help = "Shell to generate functions for")]
    pub shell: ShellKind,
}

const POSIX_FUNCTIONS: &str = r#"ghws() {
    local target
    target=$(gh worktree pr switch --shell "$@") || return
    [ -n "$target" ] && cd "$target"
}

ghwc() {
    local target
    target=$(gh worktree pr checkout --shell "$@") || return
    [ -n "$target" ] && cd "$target"
}
"#;

const FISH_FUNCTIONS: &str = r#"function ghws
    set -l target (gh worktree pr switch --shell $argv); or return
    test -n "$target"; and cd $target
end

function ghwc
    set -l target (gh worktree pr checkout --shell $argv); or return
    test -n "$target"; and cd $target
end
"#;

/// The wrapper functions for `shell`.
pub fn script(shell: ShellKind) -> &'static str {
    match shell {
        ShellKind::Bash | ShellKind::Zsh => POSIX_FUNCTIONS,
        ShellKind::Fish => FISH_FUNCTIONS,
    }
}

pub fn run(args: Args) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(script(args.shell).as_bytes())?;
    Ok(())
}
