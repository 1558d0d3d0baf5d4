use crate::SETUP_CONFIG_FILE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SetupSection {
    #[serde(default)]
    pub run: Option<Vec<String>>,
}

/// Parsed `.gh-worktree.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SetupConfig {
    #[serde(default)]
    pub setup: Option<SetupSection>,
}

impl SetupConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        // A stream with no document at all is not valid input for serde_yaml.
        let has_document = contents
            .lines()
            .map(str::trim)
            .any(|l| !l.is_empty() && !l.starts_with('#'));
        if !has_document {
            return Ok(Self::default());
        }
        let parsed: Option<Self> =
            serde_yaml::from_str(contents).context("Invalid setup configuration")?;
        Ok(parsed.unwrap_or_default())
    }

    /// Commands to run, skipping blank entries.
    pub fn commands(&self) -> Vec<&str> {
        self.setup
            .as_ref()
            .and_then(|s| s.run.as_ref())
            .map(|cmds| {
                cmds.iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Loads the setup file from the main worktree. A missing file is an empty config.
pub fn load_setup_config(main_worktree: &Path) -> Result<SetupConfig> {
    let path = main_worktree.join(SETUP_CONFIG_FILE);
    if !path.is_file() {
        return Ok(SetupConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SetupConfig::parse(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_commands() {
        let config = SetupConfig::parse("setup:\n  run:\n    - npm ci\n    - '  '\n    - make\n")
            .unwrap();
        assert_eq!(config.commands(), vec!["npm ci", "make"]);
    }

    #[test]
    fn test_parse_empty_forms() {
        for yaml in ["", "   \n", "# only a comment\n", "setup:\n", "setup:\n  run:\n"] {
            let config = SetupConfig::parse(yaml).unwrap();
            assert!(config.commands().is_empty(), "{yaml:?}");
        }
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(SetupConfig::parse("setup:\n  run: 42\n").is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = load_setup_config(dir.path()).unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn test_load_from_main_worktree() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETUP_CONFIG_FILE),
            "setup:\n  run:\n    - echo hi\n",
        )
        .unwrap();
        let config = load_setup_config(dir.path()).unwrap();
        assert_eq!(config.commands(), vec!["echo hi"]);
    }
}
