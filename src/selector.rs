//! Parsing of the positional selector accepted by `checkout`, `remove` and `switch`.
//!
//! A selector is one of:
//! - a PR number (`123`)
//! - a PR URL (`https://github.com/owner/repo/pull/123`, trailing segments allowed)
//! - a branch name (`feature/login`)
//!
//! Anything that looks numeric is treated as a PR number and never falls back
//! to a branch, so `0` is an invalid PR rather than a branch called `0`.

use crate::github::RepoRef;
use crate::validate::{validate_branch_name, validate_url, PrNumber, ValidationError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Pr {
        number: PrNumber,
        /// The repository named by a URL selector.
        repo: Option<RepoRef>,
    },
    Branch(String),
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Empty("selector"));
        }

        if looks_like_url(input) {
            let (repo, number) = parse_pr_url(input)?;
            return Ok(Self::Pr {
                number,
                repo: Some(repo),
            });
        }

        if looks_numeric(input) {
            let number = match input.parse::<i64>() {
                Ok(n) => PrNumber::new(n)?,
                Err(_) => {
                    return Err(ValidationError::Malformed {
                        what: "PR number",
                        value: input.to_string(),
                        reason: "number is too large",
                    })
                }
            };
            return Ok(Self::Pr { number, repo: None });
        }

        validate_branch_name(input)?;
        Ok(Self::Branch(input.to_string()))
    }

    pub fn pr_number(&self) -> Option<PrNumber> {
        match self {
            Self::Pr { number, .. } => Some(*number),
            Self::Branch(_) => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pr { number, .. } => write!(f, "#{number}"),
            Self::Branch(name) => write!(f, "branch '{name}'"),
        }
    }
}

/// Parses a selector that must identify a PR (number or URL).
pub fn parse_pr_selector(input: &str) -> Result<PrNumber, ValidationError> {
    match Selector::parse(input)? {
        Selector::Pr { number, .. } => Ok(number),
        Selector::Branch(value) => Err(ValidationError::Malformed {
            what: "PR identifier",
            value,
            reason: "expected a PR number or URL",
        }),
    }
}

fn looks_like_url(input: &str) -> bool {
    input.contains("://")
}

fn looks_numeric(input: &str) -> bool {
    let digits = input.strip_prefix(['-', '+']).unwrap_or(input);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Extracts `(owner/repo, number)` from `https://github.com/<owner>/<repo>/pull/<n>[/...]`.
pub fn parse_pr_url(raw: &str) -> Result<(RepoRef, PrNumber), ValidationError> {
    let url = validate_url(raw)?;

    let malformed = |reason| ValidationError::Malformed {
        what: "PR URL",
        value: raw.to_string(),
        reason,
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [owner, repo, "pull", number, ..] => {
            let repo = RepoRef::new(owner, repo)?;
            let number = PrNumber::parse(number).map_err(|e| match e {
                ValidationError::PrNumberOutOfRange(_) => e,
                _ => malformed("PR number is not numeric"),
            })?;
            Ok((repo, number))
        }
        _ => Err(malformed("expected https://github.com/OWNER/REPO/pull/NUMBER")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        let sel = Selector::parse("123").unwrap();
        assert_eq!(sel.pr_number().map(PrNumber::get), Some(123));
        assert_eq!(
            Selector::parse(" 42 ").unwrap().pr_number().map(PrNumber::get),
            Some(42)
        );
    }

    #[test]
    fn test_numeric_never_falls_back_to_branch() {
        assert!(matches!(
            Selector::parse("0"),
            Err(ValidationError::PrNumberOutOfRange(0))
        ));
        assert!(matches!(
            Selector::parse("-1"),
            Err(ValidationError::PrNumberOutOfRange(-1))
        ));
        assert!(matches!(
            Selector::parse("1000000"),
            Err(ValidationError::PrNumberOutOfRange(_))
        ));
        assert!(matches!(
            Selector::parse("99999999999999999999999"),
            Err(ValidationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_parse_url() {
        let sel = Selector::parse("https://github.com/acme/project/pull/77").unwrap();
        match sel {
            Selector::Pr { number, repo } => {
                assert_eq!(number.get(), 77);
                assert_eq!(repo.unwrap().to_string(), "acme/project");
            }
            other => panic!("unexpected selector {other:?}"),
        }
    }

    #[test]
    fn test_parse_url_with_trailing_segments() {
        let (repo, number) =
            parse_pr_url("https://github.com/acme/project/pull/5/files#diff-1").unwrap();
        assert_eq!(repo.name, "project");
        assert_eq!(number.get(), 5);
    }

    #[test]
    fn test_parse_url_rejections() {
        assert!(matches!(
            Selector::parse("http://github.com/acme/project/pull/1"),
            Err(ValidationError::DisallowedUrl { .. })
        ));
        assert!(matches!(
            Selector::parse("https://gitlab.com/acme/project/pull/1"),
            Err(ValidationError::DisallowedUrl { .. })
        ));
        assert!(matches!(
            Selector::parse("https://github.com/acme/project/issues/1"),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(matches!(
            Selector::parse("https://github.com/acme/project/pull/abc"),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(matches!(
            Selector::parse("https://github.com/acme/project/pull/0"),
            Err(ValidationError::PrNumberOutOfRange(0))
        ));
    }

    #[test]
    fn test_branch_containing_pull_segment() {
        assert_eq!(
            Selector::parse("team/pull/x").unwrap(),
            Selector::Branch("team/pull/x".to_string())
        );
        assert_eq!(
            Selector::parse("acme/project/pull/3").unwrap(),
            Selector::Branch("acme/project/pull/3".to_string())
        );
    }

    #[test]
    fn test_parse_branch() {
        assert_eq!(
            Selector::parse("feature/login").unwrap(),
            Selector::Branch("feature/login".to_string())
        );
        assert!(Selector::parse("feature login").is_err());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("--upload-pack=evil").is_err());
    }

    #[test]
    fn test_parse_pr_selector_rejects_branch() {
        assert_eq!(parse_pr_selector("12").map(PrNumber::get), Ok(12));
        assert!(parse_pr_selector("feature/login").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Selector::parse("42").unwrap().to_string(), "#42");
        assert_eq!(Selector::parse("feature/x").unwrap().to_string(), "branch 'feature/x'");
    }
}
