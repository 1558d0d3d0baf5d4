//! Shell completion generation via `clap_complete`.

use super::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

#[derive(clap::Args)]
#[command(about = "Generate shell completion scripts")]
pub struct Args {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Name completions are registered under.
const BIN_NAME: &str = "gh-worktree";

pub fn write_completions(shell: Shell, out: &mut dyn io::Write) {
    generate(shell, &mut Cli::command(), BIN_NAME, out);
}

pub fn run(args: Args) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}
