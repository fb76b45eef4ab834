//! Group routing: maps an entry's relative path to its dedup/order scope.
//!
//! A group (subpath) is the entry's folder path truncated to the configured
//! level. Deduplication and ordering never cross group boundaries.

use std::fmt;
use std::path::PathBuf;

/// Root group used for entries with an empty relative path.
pub const ROOT_GROUP: &str = "(root)";

/// Identifier of a dedup/order scope, derived from a relative path.
///
/// Stored as a `/`-joined folder path. Level semantics:
/// - `0`: top-level folder only,
/// - `-1`: full folder path,
/// - `N > 0`: folder path truncated to depth `N + 1`, clamped to the actual
///   depth.
///
/// A single-component path groups under that component itself; an empty path
/// falls back to [`ROOT_GROUP`].
///
/// # Examples
/// ```
/// use corpus_shuffler::grouping::GroupKey;
///
/// let key = GroupKey::from_rel_path("nord/balti/2021/article.json", -1);
/// assert_eq!(key.as_str(), "nord/balti/2021");
///
/// let key = GroupKey::from_rel_path("nord/balti/2021/article.json", 0);
/// assert_eq!(key.as_str(), "nord");
///
/// let key = GroupKey::from_rel_path("nord/balti/2021/article.json", 1);
/// assert_eq!(key.as_str(), "nord/balti");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    /// Derives the group for `rel_path` at the given `level`.
    ///
    /// `level` is assumed valid (`>= -1`); configuration validation rejects
    /// anything else before routing starts.
    pub fn from_rel_path(rel_path: &str, level: i32) -> Self {
        let parts: Vec<&str> = rel_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        if parts.is_empty() {
            return Self(ROOT_GROUP.to_string());
        }

        // The last component is the file name unless it is the only one.
        let folders: &[&str] = if parts.len() > 1 {
            &parts[..parts.len() - 1]
        } else {
            &parts[..1]
        };

        let kept: &[&str] = match level {
            0 => &folders[..1.min(folders.len())],
            -1 => folders,
            n => {
                let depth = (n as usize + 1).min(folders.len());
                &folders[..depth]
            }
        };

        Self(kept.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative output directory for this group.
    pub fn to_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
