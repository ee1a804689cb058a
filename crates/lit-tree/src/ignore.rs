use std::collections::BTreeSet;
use std::ffi::OsStr;

use lit_types::META_DIR;

/// Names excluded from scans, staging and working-directory clearing.
///
/// A name matches at any depth in scans and staging. Clearing spares it only
/// at the top level of the working directory. The metadata directory always
/// matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IgnoreRules {
    names: BTreeSet<String>,
}

impl IgnoreRules {
    /// Rules that exclude only the metadata directory.
    pub fn none() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Rules that exclude the given names plus the metadata directory.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if an entry called `name` is excluded.
    pub fn is_ignored(&self, name: &str) -> bool {
        name == META_DIR || self.names.contains(name)
    }

    /// Like [`is_ignored`](Self::is_ignored) for a raw file name. Names that
    /// are not UTF-8 never match.
    pub fn is_ignored_os(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.is_ignored(n))
    }

    /// Configured names, excluding the implicit metadata directory.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new(["node_modules"])
    }
}
