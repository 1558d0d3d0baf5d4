//! gh-worktree - pull request worktrees for the GitHub CLI
//!
//! Installed as a `gh` extension; `gh worktree <args>` runs this binary
//! with the same arguments.

use clap::Parser;
use gh_worktree::{
    commands::{self, Cli},
    log_error,
    logging::init_logging,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose());
    let shell_mode = cli.shell_mode();

    if let Err(e) = commands::run(cli) {
        // shell wrappers treat an empty stdout as "stay put"; keep stderr clean too
        if !shell_mode {
            log_error!("{e:#}");
        }
        std::process::exit(1);
    }
}
