//! xtask - Development automation tasks for gh-worktree
//!
//! Tasks that are only needed when building releases, kept out of the
//! distributed binary.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_mangen::Man;
use std::fs;
use std::path::{Path, PathBuf};

/// Pages generated by `gen-man`, as (page name, subcommand path).
const PAGES: &[(&str, &[&str])] = &[
    ("gh-worktree", &[]),
    ("gh-worktree-pr-checkout", &["pr", "checkout"]),
    ("gh-worktree-pr-list", &["pr", "list"]),
    ("gh-worktree-pr-remove", &["pr", "remove"]),
    ("gh-worktree-pr-switch", &["pr", "switch"]),
    ("gh-worktree-pr-promote", &["pr", "promote"]),
    ("gh-worktree-shell-init", &["shell-init"]),
];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development automation tasks for gh-worktree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate man pages for gh-worktree commands
    GenMan {
        /// Output directory for man pages
        #[arg(long, default_value = "man")]
        output_dir: PathBuf,

        /// Specific page to generate (default: all pages)
        #[arg(long)]
        command: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenMan {
            output_dir,
            command,
        } => generate_man_pages(&output_dir, command.as_deref()),
    }
}

/// The clap command behind a man page, renamed to the page name.
fn command_for_page(page: &str) -> Option<clap::Command> {
    let (name, path) = PAGES.iter().find(|(name, _)| *name == page)?;
    let mut cmd = gh_worktree::commands::Cli::command();
    for segment in path.iter() {
        cmd = cmd.find_subcommand(segment)?.clone();
    }
    Some(cmd.name(*name))
}

/// Generate man pages and write them to a directory
fn generate_man_pages(output_dir: &Path, page: Option<&str>) -> Result<()> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let pages: Vec<&str> = match page {
        Some(name) => vec![name],
        None => PAGES.iter().map(|(name, _)| *name).collect(),
    };

    for name in pages {
        let cmd = command_for_page(name).with_context(|| format!("Unknown page: {name}"))?;

        let mut buffer = Vec::new();
        Man::new(cmd).render(&mut buffer)?;

        let file_path = output_dir.join(format!("{name}.1"));
        fs::write(&file_path, &buffer)
            .with_context(|| format!("Failed to write man page: {}", file_path.display()))?;

        eprintln!("Generated: {}", file_path.display());
    }

    eprintln!("\nMan pages generated in: {}", output_dir.display());
    Ok(())
}
