use super::{load_setup_config, SetupConfig, SetupContext};
use crate::output::Output;
use crate::MAIN_DIR_ENV;
use anyhow::Result;
use std::process::{Command, Stdio};

/// Outcome of a setup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupResult {
    /// Number of commands that were started.
    pub ran: usize,
    /// One warning line per failed command.
    pub failures: Vec<String>,
}

impl SetupResult {
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the configured setup commands inside a new worktree.
#[derive(Debug, Clone, Default)]
pub struct SetupExecutor {
    config: SetupConfig,
}

impl SetupExecutor {
    pub fn new(config: SetupConfig) -> Self {
        Self { config }
    }

    /// Reads `.gh-worktree.yml` from the main worktree.
    pub fn load(ctx: &SetupContext) -> Result<Self> {
        Ok(Self::new(load_setup_config(&ctx.main_worktree)?))
    }

    pub fn has_commands(&self) -> bool {
        !self.config.commands().is_empty()
    }

    pub fn execute(&self, ctx: &SetupContext, output: &mut dyn Output) -> Result<SetupResult> {
        let commands = self.config.commands();
        let mut result = SetupResult::default();
        if commands.is_empty() {
            return Ok(result);
        }

        output.info("→ Running post-creation setup...");

        for cmd in commands {
            output.debug(&format!("sh -c {cmd:?} in {}", ctx.worktree_path.display()));

            let mut command = Command::new("sh");
            command
                .args(["-c", cmd])
                .current_dir(&ctx.worktree_path)
                .env(MAIN_DIR_ENV, &ctx.main_worktree)
                .stdin(Stdio::null());
            if ctx.stdout_to_stderr {
                command.stdout(Stdio::from(std::io::stderr()));
            }

            result.ran += 1;
            let failure = match command.status() {
                Ok(status) if status.success() => None,
                Ok(status) => Some(match status.code() {
                    Some(code) => format!("Command failed (exit {code}): {cmd}"),
                    None => format!("Command terminated by signal: {cmd}"),
                }),
                Err(e) => Some(format!("Command failed to start: {cmd} ({e})")),
            };

            match failure {
                None => output.info(&format!("  ✓ {cmd}")),
                Some(msg) => {
                    output.warning(&msg);
                    result.failures.push(msg);
                }
            }
        }

        if result.success() {
            output.success("Setup completed");
        } else {
            output.warning("Setup completed with warnings");
        }

        Ok(result)
    }
}
