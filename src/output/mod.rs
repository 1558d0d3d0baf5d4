//! Output abstraction layer for separating IO from business logic.
//!
//! Commands accept `&mut dyn Output` and use its methods instead of direct
//! `println!` or `eprintln!` calls:
//!
//! ```ignore
//! pub fn run_with_output(args: Args, output: &mut dyn Output) -> Result<()> {
//!     output.step("Fetching PR #12...");
//!     output.result("Created worktree for #12 at ../repo-pr12");
//!     Ok(())
//! }
//! ```
//!
//! Shell mode (`--shell`) is quiet mode: human-oriented messages are dropped
//! and stdout carries nothing but the path emitted through [`Output::shell_path`].

mod cli;

pub use cli::CliOutput;
pub use test::{OutputEntry, TestOutput};

use std::path::Path;

/// Configuration for output behavior.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Suppress most output when true.
    pub quiet: bool,
    /// Enable debug/verbose output when true.
    pub verbose: bool,
}

impl OutputConfig {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }
}

/// Trait for abstracting output operations.
///
/// Implementors should respect `quiet` and `verbose` modes where appropriate.
pub trait Output {
    // ─────────────────────────────────────────────────────────────────────────
    // Basic Messages
    // ─────────────────────────────────────────────────────────────────────────

    /// Display an informational message.
    /// Respects quiet mode.
    fn info(&mut self, msg: &str);

    /// Display a success message.
    /// Respects quiet mode.
    fn success(&mut self, msg: &str);

    /// Display a warning message to stderr.
    /// Always shown (not affected by quiet mode).
    fn warning(&mut self, msg: &str);

    /// Display an error message to stderr.
    /// Always shown (not affected by quiet mode).
    fn error(&mut self, msg: &str);

    /// Display a debug message.
    /// Only shown in verbose mode.
    fn debug(&mut self, msg: &str);

    // ─────────────────────────────────────────────────────────────────────────
    // Structured Output
    // ─────────────────────────────────────────────────────────────────────────

    /// Display an intermediate step message.
    /// Only shown in verbose mode.
    fn step(&mut self, msg: &str);

    /// Display a final result message.
    /// The 1-2 line summary at the end of a command.
    fn result(&mut self, msg: &str);

    /// Display a key-value detail, rendered as "Key: value".
    /// Respects quiet mode.
    fn detail(&mut self, key: &str, value: &str);

    // ─────────────────────────────────────────────────────────────────────────
    // Special Output
    // ─────────────────────────────────────────────────────────────────────────

    /// Print a worktree path for a shell wrapper to `cd` into.
    /// Written to stdout even in quiet mode.
    fn shell_path(&mut self, path: &Path);

    /// Output raw, unformatted content (JSON, tables).
    fn raw(&mut self, content: &str);

    // ─────────────────────────────────────────────────────────────────────────
    // State Queries
    // ─────────────────────────────────────────────────────────────────────────

    fn is_quiet(&self) -> bool;
}
