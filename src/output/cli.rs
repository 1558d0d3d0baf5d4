//! CLI output implementation.

use super::{Output, OutputConfig};
use crate::styles::{self, colors_enabled, colors_enabled_stderr};
use std::path::Path;

/// CLI output implementation that writes directly to stdout/stderr.
///
/// Git-like output format:
/// - `step()` → verbose only, no prefix
/// - `result()` → primary output, always shown (unless quiet)
/// - `warning()` → `eprintln!("warning: {msg}")`
/// - `error()` → `eprintln!("error: {msg}")`
#[derive(Debug)]
pub struct CliOutput {
    config: OutputConfig,
}

impl CliOutput {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Output for `--shell` invocations.
    pub fn shell(verbose: bool) -> Self {
        Self::new(OutputConfig::new(true, verbose))
    }
}

impl Output for CliOutput {
    fn info(&mut self, msg: &str) {
        if !self.config.quiet {
            println!("{msg}");
        }
    }

    fn success(&mut self, msg: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                println!("{}{msg}{}", styles::GREEN, styles::RESET);
            } else {
                println!("{msg}");
            }
        }
    }

    fn warning(&mut self, msg: &str) {
        if colors_enabled_stderr() {
            eprintln!("{}warning:{} {msg}", styles::YELLOW, styles::RESET);
        } else {
            eprintln!("warning: {msg}");
        }
    }

    fn error(&mut self, msg: &str) {
        if colors_enabled_stderr() {
            eprintln!("{}error:{} {msg}", styles::RED, styles::RESET);
        } else {
            eprintln!("error: {msg}");
        }
    }

    fn debug(&mut self, msg: &str) {
        // stderr so verbose runs never corrupt captured stdout
        if self.config.verbose {
            if colors_enabled_stderr() {
                eprintln!("{}debug: {msg}{}", styles::DIM, styles::RESET);
            } else {
                eprintln!("debug: {msg}");
            }
        }
    }

    fn step(&mut self, msg: &str) {
        if self.config.verbose && !self.config.quiet {
            if colors_enabled() {
                println!("{}{msg}{}", styles::DIM, styles::RESET);
            } else {
                println!("{msg}");
            }
        }
    }

    fn result(&mut self, msg: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                println!("{}{msg}{}", styles::BOLD, styles::RESET);
            } else {
                println!("{msg}");
            }
        }
    }

    fn detail(&mut self, key: &str, value: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                println!("{}{key}:{} {value}", styles::BOLD, styles::RESET);
            } else {
                println!("{key}: {value}");
            }
        }
    }

    fn shell_path(&mut self, path: &Path) {
        println!("{}", path.display());
    }

    fn raw(&mut self, content: &str) {
        print!("{content}");
    }

    fn is_quiet(&self) -> bool {
        self.config.quiet
    }
}
