use super::{open_repository, relative_to_cwd};
use crate::{
    core::worktree::{Registry, WorktreeDescriptor},
    git::RepoGateway,
    output::{CliOutput, Output, OutputConfig},
    styles,
};
use anyhow::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

#[derive(clap::Args)]
#[command(about = "List pull request worktrees")]
#[command(long_about = r#"
Lists the PR worktrees of the current repository with their PR number,
branch, title and path relative to the current directory.

With --all, branch worktrees created by `pr checkout <branch>` are listed in a
second section. Use --json for machine-readable output.
"#)]
pub struct Args {
    #[arg(long, help = "Include branch worktrees")]
    pub all: bool,

    #[arg(long, help = "Output in JSON format")]
    pub json: bool,

    #[arg(short, long, help = "Be verbose; show detailed progress")]
    pub verbose: bool,
}

pub fn run(args: Args) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(false, args.verbose));
    let git = open_repository(false)?;
    run_list(&args, &git, &mut output)
}

/// A worktree as emitted by `--json`.
#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    worktree: &'a WorktreeDescriptor,
    relative_path: String,
}

fn run_list<G: RepoGateway>(args: &Args, gateway: &G, output: &mut dyn Output) -> Result<()> {
    let registry = Registry::open(gateway)?;
    let prs = registry.pr_worktrees()?;
    let branches = if args.all {
        registry.branch_worktrees()?
    } else {
        Vec::new()
    };
    output.debug(&format!(
        "Found {} PR and {} branch worktrees of {}",
        prs.len(),
        branches.len(),
        registry.repo_name()
    ));

    if args.json {
        let entries: Vec<JsonEntry> = prs
            .iter()
            .chain(branches.iter())
            .map(|wt| JsonEntry {
                worktree: wt,
                relative_path: relative_to_cwd(&wt.path).display().to_string(),
            })
            .collect();
        output.raw(&format!("{}\n", serde_json::to_string_pretty(&entries)?));
        return Ok(());
    }

    if prs.is_empty() {
        output.info("No PR worktrees found.");
    } else {
        output.info("PR worktrees:");
        output.raw(&format!("{}\n", render_table(&prs, true)));
    }

    if args.all {
        if branches.is_empty() {
            output.info("No branch worktrees found.");
        } else {
            output.info("Branch worktrees:");
            output.raw(&format!("{}\n", render_table(&branches, false)));
        }
    }

    Ok(())
}

fn render_table(worktrees: &[WorktreeDescriptor], with_title: bool) -> String {
    let mut builder = Builder::new();

    for wt in worktrees {
        let label = styles::bold(&wt.label());
        let branch = wt.branch.clone().unwrap_or_else(|| "(detached)".to_string());
        let path = styles::dim(&relative_to_cwd(&wt.path).display().to_string());

        if with_title {
            builder.push_record([label, branch, wt.title_or_placeholder().to_string(), path]);
        } else {
            builder.push_record([branch, path]);
        }
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeGateway;
    use crate::output::{OutputEntry, TestOutput};

    const ROOT: &str = "/nonexistent/work/project";

    const PORCELAIN: &str = "\
worktree /nonexistent/work/project
HEAD 1111111111111111111111111111111111111111
branch refs/heads/main

worktree /nonexistent/work/project-pr12
HEAD 2222222222222222222222222222222222222222
branch refs/heads/fix-login

worktree /nonexistent/work/project-docs
HEAD 3333333333333333333333333333333333333333
branch refs/heads/docs
";

    fn gateway() -> FakeGateway {
        FakeGateway::new(ROOT)
            .with_porcelain(PORCELAIN)
            .with_config(ROOT, "branch.fix-login.gh-worktree-pr-title", "Fix login")
    }

    fn raw_text(output: &TestOutput) -> String {
        output
            .entries()
            .iter()
            .filter_map(|e| match e {
                OutputEntry::Raw(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_list_pr_worktrees() {
        let gw = gateway();
        let mut output = TestOutput::new();
        let args = Args {
            all: false,
            json: false,
            verbose: false,
        };

        run_list(&args, &gw, &mut output).unwrap();

        assert!(output.has_info("PR worktrees:"));
        let table = raw_text(&output);
        assert!(table.contains("#12"));
        assert!(table.contains("fix-login"));
        assert!(table.contains("Fix login"));
        assert!(!table.contains("docs"));
    }

    #[test]
    fn test_list_all_includes_branch_section() {
        let gw = gateway();
        let mut output = TestOutput::new();
        let args = Args {
            all: true,
            json: false,
            verbose: false,
        };

        run_list(&args, &gw, &mut output).unwrap();
        assert!(output.has_info("Branch worktrees:"));
        assert!(raw_text(&output).contains("docs"));
    }

    #[test]
    fn test_list_json() {
        let gw = gateway();
        let mut output = TestOutput::new();
        let args = Args {
            all: true,
            json: true,
            verbose: false,
        };

        run_list(&args, &gw, &mut output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw_text(&output)).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["kind"], "pr");
        assert_eq!(entries[0]["pr_number"], 12);
        assert_eq!(entries[0]["title"], "Fix login");
        assert_eq!(entries[1]["kind"], "branch");
        assert_eq!(entries[1]["branch"], "docs");
    }

    #[test]
    fn test_list_empty() {
        let gw = FakeGateway::new(ROOT).with_porcelain(
            "worktree /nonexistent/work/project\nHEAD 1111111111111111111111111111111111111111\nbranch refs/heads/main\n",
        );
        let mut output = TestOutput::new();
        let args = Args {
            all: false,
            json: false,
            verbose: false,
        };
        run_list(&args, &gw, &mut output).unwrap();
        assert!(output.has_info("No PR worktrees found."));
    }
}
