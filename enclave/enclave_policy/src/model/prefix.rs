//! Prefix sets.

use enclave_core::TypeName;
use serde::{Deserialize, Serialize};

/// An ordered set of name prefixes.
///
/// Matching is plain string-prefix matching on the full dotted name, so
/// `org.slf4j` also matches `org.slf4jx.Foo`. Use a trailing dot to stop at a
/// package boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixSet(Vec<String>);

impl PrefixSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prefix. Duplicates are ignored.
    pub fn insert(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !self.0.contains(&prefix) {
            self.0.push(prefix);
        }
    }

    /// The first prefix that matches `name`.
    pub fn matching(&self, name: &TypeName) -> Option<&str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|prefix| name.has_prefix(prefix))
    }

    /// Check whether any prefix matches `name`.
    pub fn matches(&self, name: &TypeName) -> bool {
        self.matching(name).is_some()
    }

    /// Number of prefixes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the prefixes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PrefixSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for prefix in iter {
            set.insert(prefix);
        }
        set
    }
}
