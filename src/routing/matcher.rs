//! Route matching logic.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A prefix only matches whole segments: `/users` matches `/users/1`, not `/usersx`

/// Matches a mount prefix and yields the remaining subpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. Trailing slashes are ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Subpath below the prefix, always starting with `/`.
    ///
    /// `None` when `path` is not under the prefix.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        match path.strip_prefix(self.prefix.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}
