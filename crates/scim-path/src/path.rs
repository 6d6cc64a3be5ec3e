//! Dotted attribute-path parsing.

use std::collections::BTreeSet;

use crate::types::Path;

/// SCIM enterprise user extension. Its name contains a `.` (`2.0`), so it
/// must never be split.
pub const ENTERPRISE_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Set of whole path strings that are kept as a single step.
///
/// Entries are stored lowercased and compared case-insensitively against the
/// complete path string, never against a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicPaths {
    paths: BTreeSet<String>,
}

impl AtomicPaths {
    /// An empty exception set: every path is split on `.`.
    pub fn empty() -> Self {
        Self { paths: BTreeSet::new() }
    }

    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths.into_iter().map(|p| p.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(&path.to_lowercase())
    }
}

impl Default for AtomicPaths {
    /// The enterprise user extension URN.
    fn default() -> Self {
        Self::new([ENTERPRISE_USER_SCHEMA])
    }
}

/// Parse a dotted attribute path into lowercase steps.
///
/// A path listed in `atomic` becomes one step. Every other path is split on
/// `.`; empty segments are kept as empty keys.
///
/// # Example
///
/// ```
/// use scim_path::{parse_attr_path, AtomicPaths};
///
/// let atomic = AtomicPaths::default();
/// assert_eq!(parse_attr_path("name.givenName", &atomic), vec!["name", "givenname"]);
/// assert_eq!(
///     parse_attr_path("urn:ietf:params:scim:schemas:extension:enterprise:2.0:User", &atomic),
///     vec!["urn:ietf:params:scim:schemas:extension:enterprise:2.0:user"]
/// );
/// ```
pub fn parse_attr_path(path: &str, atomic: &AtomicPaths) -> Path {
    if atomic.contains(path) {
        return vec![path.to_lowercase()];
    }
    path.split('.').map(str::to_lowercase).collect()
}

/// Format steps back into a dotted path.
pub fn format_attr_path(path: &[String]) -> String {
    path.join(".")
}
