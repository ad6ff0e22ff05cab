//! Dotted type names.
//!
//! A [`TypeName`] is how both sides of the boundary refer to a type: a
//! dotted path of package segments followed by a simple name, for example
//! `engine.config.Environment`. Names are validated once on construction and
//! are cheap to clone afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{LoadError, Result};

/// A validated, dotted type name.
///
/// Invariant: non-empty, and no segment is empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Parse and validate a type name.
    ///
    /// # Examples
    ///
    /// ```
    /// use enclave_core::TypeName;
    ///
    /// let name = TypeName::new("engine.config.Environment").unwrap();
    /// assert_eq!(name.simple_name(), "Environment");
    /// assert_eq!(name.package(), Some("engine.config"));
    /// assert!(TypeName::new("engine..Recipe").is_err());
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(LoadError::InvalidTypeName(name.to_string()).into());
        }
        Ok(Self(Arc::from(name)))
    }

    /// The full dotted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dotted segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Get the segment at a zero-based position.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments().nth(index)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The last segment.
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Everything before the last segment, if there is a package.
    pub fn package(&self) -> Option<&str> {
        self.0.rfind('.').map(|idx| &self.0[..idx])
    }

    /// Plain string-prefix test against the full dotted name.
    ///
    /// `"org.slf4j"` matches `org.slf4j.Logger` and also `org.slf4jx.Other`;
    /// prefix sets that need a package boundary should end with a dot.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// The resource path of the type, e.g. `engine/config/Environment`.
    pub fn to_resource_path(&self) -> String {
        self.0.replace('.', "/")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl FromStr for TypeName {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for TypeName {
    type Error = crate::error::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0.to_string()
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_segments() {
        for bad in ["", ".", "engine.", ".engine", "a..b"] {
            assert!(TypeName::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_segments() {
        let name = TypeName::new("org.acme.java.tree.J").unwrap();
        assert_eq!(name.depth(), 5);
        assert_eq!(name.segment(3), Some("tree"));
        assert_eq!(name.segment(5), None);
        assert_eq!(name.simple_name(), "J");
        assert_eq!(name.to_resource_path(), "org/acme/java/tree/J");
    }

    #[test]
    fn test_single_segment() {
        let name = TypeName::new("Recipe").unwrap();
        assert_eq!(name.simple_name(), "Recipe");
        assert_eq!(name.package(), None);
    }

    #[test]
    fn test_prefix_is_plain_string_prefix() {
        let name = TypeName::new("org.slf4jx.Logger").unwrap();
        assert!(name.has_prefix("org.slf4j"));
        assert!(!name.has_prefix("org.slf4j."));
    }

    #[test]
    fn test_serde_validates() {
        let name: TypeName = serde_json::from_str("\"engine.Recipe\"").unwrap();
        assert_eq!(name.as_str(), "engine.Recipe");
        assert!(serde_json::from_str::<TypeName>("\"engine..Recipe\"").is_err());
    }
}
