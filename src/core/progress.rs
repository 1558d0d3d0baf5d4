//! Adapters bridging core traits to the command layer.

use super::{HookOutcome, HookRunner, ProgressSink};
use crate::hooks::{SetupContext, SetupExecutor};
use crate::output::Output;

/// Adapter that forwards `ProgressSink` calls to an `Output` implementation.
///
/// Use this for commands that never run setup (e.g., remove, promote).
pub struct OutputSink<'a>(pub &'a mut dyn Output);

impl ProgressSink for OutputSink<'_> {
    fn on_step(&mut self, msg: &str) {
        self.0.step(msg);
    }

    fn on_warning(&mut self, msg: &str) {
        self.0.warning(msg);
    }

    fn on_debug(&mut self, msg: &str) {
        self.0.debug(msg);
    }
}

/// Combined adapter for worktree creation: progress reporting plus setup.
///
/// # Example
///
/// ```ignore
/// let result = {
///     let mut bridge = CommandBridge::new(&mut output, run_setup);
///     core::worktree::create::create_pr_worktree(&params, &git, &mut bridge)?
/// };
/// // bridge dropped, output is available again for rendering
/// render_result(&result, &mut output);
/// ```
pub struct CommandBridge<'a> {
    output: &'a mut dyn Output,
    enabled: bool,
}

impl<'a> CommandBridge<'a> {
    pub fn new(output: &'a mut dyn Output, run_setup: bool) -> Self {
        Self {
            output,
            enabled: run_setup,
        }
    }
}

impl ProgressSink for CommandBridge<'_> {
    fn on_step(&mut self, msg: &str) {
        self.output.step(msg);
    }

    fn on_warning(&mut self, msg: &str) {
        self.output.warning(msg);
    }

    fn on_debug(&mut self, msg: &str) {
        self.output.debug(msg);
    }
}

impl HookRunner for CommandBridge<'_> {
    fn run_setup(&mut self, ctx: &SetupContext) -> anyhow::Result<HookOutcome> {
        if !self.enabled {
            self.output.debug("Post-creation setup disabled");
            return Ok(HookOutcome {
                success: true,
                skipped: true,
            });
        }

        let executor = SetupExecutor::load(ctx)?;
        if !executor.has_commands() {
            return Ok(HookOutcome {
                success: true,
                skipped: true,
            });
        }

        let result = executor.execute(ctx, self.output)?;
        Ok(HookOutcome {
            success: result.success(),
            skipped: false,
        })
    }
}
