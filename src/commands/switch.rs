use super::{
    open_repository, relative_to_cwd,
    select::{choose_worktree, Target},
};
use crate::{
    core::worktree::Registry,
    git::RepoGateway,
    output::{CliOutput, Output, OutputConfig},
};
use anyhow::Result;

#[derive(clap::Args)]
#[command(about = "Switch to an existing pull request worktree")]
#[command(long_about = r#"
Prints how to change into an existing PR worktree. With --shell, only the
path is printed (nothing at all when no worktree was chosen), so a shell
function can cd into it:

  ghws() {
      local target
      target=$(gh worktree pr switch --shell "$@")
      [ -n "$target" ] && cd "$target"
  }

`gh worktree shell-init` prints this function for bash, zsh and fish.
"#)]
pub struct Args {
    #[arg(help = "PR number, PR URL, branch or directory name")]
    pub selector: Option<String>,

    #[arg(short, long, help = "Output the path only, for use in shell functions")]
    pub shell: bool,

    #[arg(long, help = "Offer branch worktrees in the interactive picker too")]
    pub all: bool,

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
    run_switch(&args, &git, &mut output)
}

fn run_switch<G: RepoGateway>(args: &Args, gateway: &G, output: &mut dyn Output) -> Result<()> {
    let registry = Registry::open(gateway)?;
    let worktree = match choose_worktree(
        &registry,
        gateway,
        args.selector.as_deref(),
        args.all,
        "Select a worktree to switch to",
    )? {
        Target::Worktree(wt) => wt,
        Target::Nothing(msg) => {
            // quiet in shell mode, so the wrapper sees an empty path
            output.info(&msg);
            return Ok(());
        }
    };

    let relative = relative_to_cwd(&worktree.path);
    if output.is_quiet() {
        output.shell_path(&relative);
    } else {
        output.result(&format!("To switch to worktree for {}:", worktree.label()));
        output.result(&format!("cd {}", relative.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeGateway;
    use crate::output::{OutputConfig, TestOutput};

    const PORCELAIN: &str = "\
worktree /nonexistent/work/project
HEAD 1111111111111111111111111111111111111111
branch refs/heads/main

worktree /nonexistent/work/project-pr5
HEAD 2222222222222222222222222222222222222222
branch refs/heads/five
";

    fn args(selector: &str, shell: bool) -> Args {
        Args {
            selector: Some(selector.to_string()),
            shell,
            all: false,
            verbose: false,
        }
    }

    #[test]
    fn test_switch_prints_cd_hint() {
        let gw = FakeGateway::new("/nonexistent/work/project").with_porcelain(PORCELAIN);
        let mut output = TestOutput::new();

        run_switch(&args("5", false), &gw, &mut output).unwrap();

        assert!(output.has_result("To switch to worktree for #5:"));
        assert!(output.has_result("cd "));
        assert!(output.has_result("project-pr5"));
        assert!(output.get_shell_path().is_none());
    }

    #[test]
    fn test_shell_mode_prints_only_path() {
        let gw = FakeGateway::new("/nonexistent/work/project").with_porcelain(PORCELAIN);
        let mut output = TestOutput::with_config(OutputConfig::new(true, false));

        run_switch(&args("five", true), &gw, &mut output).unwrap();

        let path = output.get_shell_path().unwrap();
        assert!(path.ends_with("project-pr5"));
        assert!(output.results().is_empty());
    }

    #[test]
    fn test_shell_mode_not_found_prints_nothing() {
        let gw = FakeGateway::new("/nonexistent/work/project").with_porcelain(PORCELAIN);
        let mut output = TestOutput::with_config(OutputConfig::new(true, false));

        run_switch(&args("6", true), &gw, &mut output).unwrap();
        assert!(output.get_shell_path().is_none());
    }
}
