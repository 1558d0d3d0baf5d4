use super::GitCommand;
use anyhow::{Context, Result};

/// A configured remote and its fetch URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

impl GitCommand {
    pub fn remote_list_verbose(&self) -> Result<Vec<Remote>> {
        let output = self
            .git()
            .args(["remote", "-v"])
            .output()
            .context("Failed to execute git remote command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git remote -v failed: {}", stderr.trim());
        }

        let stdout = String::from_utf8(output.stdout).context("Failed to parse git remote output")?;
        Ok(parse_remote_verbose(&stdout))
    }
}

/// Parses `git remote -v`, keeping the first fetch URL of each remote.
pub fn parse_remote_verbose(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();

    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url), Some("(fetch)")) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if remotes.iter().any(|r| r.name == name) {
            continue;
        }
        remotes.push(Remote {
            name: name.to_string(),
            url: url.to_string(),
        });
    }

    remotes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_verbose() {
        let output = "origin\tgit@github.com:me/project.git (fetch)\n\
                      origin\tgit@github.com:me/project.git (push)\n\
                      upstream\thttps://github.com/acme/project.git (fetch)\n\
                      upstream\tno_push (push)\n";
        let remotes = parse_remote_verbose(output);
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, "git@github.com:me/project.git");
        assert_eq!(remotes[1].name, "upstream");
    }

    #[test]
    fn test_parse_remote_verbose_skips_garbage() {
        assert!(parse_remote_verbose("").is_empty());
        assert!(parse_remote_verbose("only-a-name\n").is_empty());
        let dup = "a\turl1 (fetch)\na\turl2 (fetch)\n";
        let remotes = parse_remote_verbose(dup);
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].url, "url1");
    }
}
