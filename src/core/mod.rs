//! Core business logic abstractions.
//!
//! This module defines the traits and types that allow core operations to
//! report progress and run post-create setup without depending on specific
//! UI implementations (CLI, tests, etc.).

pub mod metadata;
mod progress;
pub mod worktree;

pub use progress::{CommandBridge, OutputSink};

use crate::hooks::SetupContext;
use anyhow::Result;

// ─────────────────────────────────────────────────────────────────────────
// Progress reporting
// ─────────────────────────────────────────────────────────────────────────

/// Trait for core operations to report progress without depending on `Output`.
///
/// Commands create an adapter (e.g., `OutputSink`) that bridges this trait
/// to the actual output implementation. Tests can use `NullSink` to suppress
/// all output.
pub trait ProgressSink {
    /// Report an intermediate step (shown in verbose mode).
    fn on_step(&mut self, msg: &str);

    /// Report a warning (always shown).
    fn on_warning(&mut self, msg: &str);

    /// Report a debug message (shown in verbose mode).
    fn on_debug(&mut self, msg: &str);
}

/// A no-op sink that discards all progress messages.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_step(&mut self, _msg: &str) {}
    fn on_warning(&mut self, _msg: &str) {}
    fn on_debug(&mut self, _msg: &str) {}
}

// ─────────────────────────────────────────────────────────────────────────
// Post-create setup
// ─────────────────────────────────────────────────────────────────────────

/// Outcome of a setup run, as seen by core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutcome {
    /// Whether every setup command succeeded.
    pub success: bool,
    /// Whether setup was skipped entirely.
    pub skipped: bool,
}

/// Trait for core operations to trigger post-create setup.
pub trait HookRunner {
    fn run_setup(&mut self, ctx: &SetupContext) -> Result<HookOutcome>;
}

/// A hook runner that skips setup. Used for `--no-setup` and in tests.
pub struct NoopHookRunner;

impl HookRunner for NoopHookRunner {
    fn run_setup(&mut self, _ctx: &SetupContext) -> Result<HookOutcome> {
        Ok(HookOutcome {
            success: true,
            skipped: true,
        })
    }
}

impl ProgressSink for NoopHookRunner {
    fn on_step(&mut self, _msg: &str) {}
    fn on_warning(&mut self, _msg: &str) {}
    fn on_debug(&mut self, _msg: &str) {}
}
