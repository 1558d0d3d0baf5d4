use super::GitCommand;
use anyhow::{Context, Result};
use std::fmt;
use std::process::Stdio;

/// One git command line, without the leading `git`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInvocation {
    args: Vec<String>,
}

impl GitInvocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for GitInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.args.join(" "))
    }
}

impl GitCommand {
    /// Executes the batch in order with output streamed to the terminal.
    ///
    /// In quiet mode child stdout is redirected to our stderr.
    pub fn execute_batch(&self, batch: &[GitInvocation]) -> Result<()> {
        for invocation in batch {
            crate::log_debug!("Running: {invocation}");

            let mut cmd = self.git();
            cmd.args(invocation.args()).stdin(Stdio::null());
            if self.quiet {
                cmd.stdout(Stdio::from(std::io::stderr()));
            }

            let status = cmd
                .status()
                .with_context(|| format!("Failed to execute {invocation}"))?;

            if !status.success() {
                match status.code() {
                    Some(code) => anyhow::bail!("{invocation} failed (exit {code})"),
                    None => anyhow::bail!("{invocation} was terminated by a signal"),
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let inv = GitInvocation::new(["fetch", "origin", "refs/pull/7/head", "--no-tags"]);
        assert_eq!(inv.to_string(), "git fetch origin refs/pull/7/head --no-tags");
    }
}
