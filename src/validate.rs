//! Input validation for everything that ends up on a git command line or in
//! git config.
//!
//! Branch names, repository names and PR numbers come from users and from the
//! GitHub API. Both are treated as untrusted: every value is checked against a
//! whitelist before it is interpolated into a git argument, and every free-form
//! string is sanitized before it is persisted.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Longest branch name accepted (matches the common filesystem name limit).
pub const MAX_BRANCH_NAME_LEN: usize = 255;

/// Longest repository or owner name accepted (GitHub's own limit).
pub const MAX_REPO_NAME_LEN: usize = 100;

/// Largest PR number accepted.
pub const MAX_PR_NUMBER: i64 = 999_999;

/// The only host PR URLs may point at.
pub const GITHUB_HOST: &str = "github.com";

static BRANCH_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9/_.\-]+$").expect("valid branch regex"));

static REPO_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.\-]+$").expect("valid repo regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{what} too long ({len} > {max} characters)")]
    TooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid {what} '{value}': contains unsafe characters")]
    UnsafeCharacters { what: &'static str, value: String },

    #[error("invalid {what} '{value}': {reason}")]
    Malformed {
        what: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid {what} '{value}': contains path traversal")]
    Traversal { what: &'static str, value: String },

    #[error("invalid PR number: {0} (must be between 1 and {MAX_PR_NUMBER})")]
    PrNumberOutOfRange(i64),

    #[error("invalid URL '{value}': {reason}")]
    DisallowedUrl { value: String, reason: &'static str },
}

/// A PR number that passed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PrNumber(u32);

impl PrNumber {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(1..=MAX_PR_NUMBER).contains(&value) {
            return Err(ValidationError::PrNumberOutOfRange(value));
        }
        // Range checked above, fits in u32.
        Ok(Self(value as u32))
    }

    /// Parses the textual form, e.g. the digits of a `pr123` directory suffix.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Self::new(n),
            Err(_) => Err(ValidationError::Malformed {
                what: "PR number",
                value: trimmed.to_string(),
                reason: "not a number",
            }),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates a branch name before it is used as a git argument or config key segment.
pub fn validate_branch_name(name: &str) -> Result<(), ValidationError> {
    const WHAT: &str = "branch name";

    if name.is_empty() {
        return Err(ValidationError::Empty(WHAT));
    }
    if name.len() > MAX_BRANCH_NAME_LEN {
        return Err(ValidationError::TooLong {
            what: WHAT,
            len: name.len(),
            max: MAX_BRANCH_NAME_LEN,
        });
    }
    if !BRANCH_NAME_RE.is_match(name) {
        return Err(ValidationError::UnsafeCharacters {
            what: WHAT,
            value: name.to_string(),
        });
    }

    if name.starts_with('-') || name.ends_with('/') {
        return Err(ValidationError::Malformed {
            what: WHAT,
            value: name.to_string(),
            reason: "cannot start with '-' or end with '/'",
        });
    }

    Ok(())
}

/// Validates a repository or owner name.
pub fn validate_repo_name(name: &str) -> Result<(), ValidationError> {
    const WHAT: &str = "repository name";

    if name.is_empty() {
        return Err(ValidationError::Empty(WHAT));
    }
    if name.len() > MAX_REPO_NAME_LEN {
        return Err(ValidationError::TooLong {
            what: WHAT,
            len: name.len(),
            max: MAX_REPO_NAME_LEN,
        });
    }
    if name.contains("..") {
        return Err(ValidationError::Traversal {
            what: WHAT,
            value: name.to_string(),
        });
    }
    if !REPO_NAME_RE.is_match(name) {
        return Err(ValidationError::UnsafeCharacters {
            what: WHAT,
            value: name.to_string(),
        });
    }

    Ok(())
}

/// Validates a user-supplied URL: HTTPS only, no credentials, github.com only.
pub fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Empty("URL"));
    }

    let disallowed = |reason| ValidationError::DisallowedUrl {
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|_| ValidationError::Malformed {
        what: "URL",
        value: raw.to_string(),
        reason: "not a valid URL",
    })?;

    if url.scheme() != "https" {
        return Err(disallowed("only HTTPS URLs are allowed"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(disallowed("URL cannot contain credentials"));
    }
    if url.host_str() != Some(GITHUB_HOST) || url.port().is_some() {
        return Err(disallowed("only github.com URLs are allowed"));
    }

    Ok(url)
}

/// Characters dropped from free text before it is persisted.
const UNSAFE_TEXT_CHARS: &[char] = &[';', '&', '|', '`', '$', '(', ')', '<', '>', '\'', '"', '\\'];

/// Makes free text (PR titles) safe to store as a git config value.
///
/// Removes NUL, turns line breaks and tabs into spaces, drops shell
/// metacharacters and trims surrounding whitespace. Applying it twice yields
/// the same result as applying it once.
pub fn sanitize_for_config(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\0' && !UNSAFE_TEXT_CHARS.contains(c))
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
