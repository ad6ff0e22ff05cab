//! Delegation rule model.

use std::fmt;

use enclave_core::utils::StructuralKind;
use enclave_core::{Tier, TypeName};

use crate::model::prefix::PrefixSet;

/// A named predicate over the segments of a type name.
#[derive(Clone)]
pub struct StructuralRule {
    name: String,
    predicate: fn(&TypeName) -> bool,
}

impl StructuralRule {
    /// Create a rule from a predicate.
    pub fn new(name: impl Into<String>, predicate: fn(&TypeName) -> bool) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    /// Names whose 4th segment is `tree`, e.g. `org.acme.java.tree.J`.
    pub fn tree_package() -> Self {
        Self::new("tree-package", |name| name.segment(3) == Some("tree"))
    }

    /// Names whose 4th segment is the visitor of the 3rd, e.g.
    /// `org.acme.java.JavaVisitor`. The comparison ignores case.
    pub fn visitor_tangle() -> Self {
        Self::new("visitor-tangle", |name| {
            match (name.segment(2), name.segment(3)) {
                (Some(package), Some(simple)) => {
                    simple.ends_with("Visitor")
                        && simple.eq_ignore_ascii_case(&format!("{}visitor", package))
                }
                _ => false,
            }
        })
    }

    /// The rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the predicate.
    pub fn matches(&self, name: &TypeName) -> bool {
        (self.predicate)(name)
    }
}

impl From<StructuralKind> for StructuralRule {
    fn from(kind: StructuralKind) -> Self {
        match kind {
            StructuralKind::TreePackage => Self::tree_package(),
            StructuralKind::VisitorTangle => Self::visitor_tangle(),
        }
    }
}

impl fmt::Debug for StructuralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructuralRule").field(&self.name).finish()
    }
}

/// A delegation rule.
#[derive(Debug, Clone)]
pub enum DelegationRule {
    /// Matching names are always defined by the isolated tier's own archives.
    NeverIsolated(PrefixSet),

    /// Matching names are shared contracts resolved from the host.
    AlwaysHost(PrefixSet),

    /// Names selected by a structural predicate are resolved from the host.
    StructuralMatch(StructuralRule),
}

impl DelegationRule {
    /// Evaluation priority; lower runs first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::NeverIsolated(_) => 0,
            Self::AlwaysHost(_) => 1,
            Self::StructuralMatch(_) => 2,
        }
    }

    /// The tier a matching name is sent to.
    pub fn tier(&self) -> Tier {
        match self {
            Self::NeverIsolated(_) => Tier::Isolated,
            Self::AlwaysHost(_) | Self::StructuralMatch(_) => Tier::Host,
        }
    }

    /// What matched, if the rule applies to `name`.
    pub fn matching<'a>(&'a self, name: &TypeName) -> Option<&'a str> {
        match self {
            Self::NeverIsolated(set) | Self::AlwaysHost(set) => set.matching(name),
            Self::StructuralMatch(rule) => rule.matches(name).then(|| rule.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> TypeName {
        TypeName::new(s).unwrap()
    }

    #[test]
    fn test_tree_package() {
        let rule = StructuralRule::tree_package();
        assert!(rule.matches(&name("org.acme.java.tree.J")));
        assert!(rule.matches(&name("org.acme.yaml.tree")));
        assert!(!rule.matches(&name("org.tree.java.J")));
        assert!(!rule.matches(&name("org.acme.tree")));
    }

    #[test]
    fn test_visitor_tangle() {
        let rule = StructuralRule::visitor_tangle();
        assert!(rule.matches(&name("org.acme.java.JavaVisitor")));
        assert!(rule.matches(&name("org.acme.yaml.YamlVisitor")));
        assert!(rule.matches(&name("org.acme.Java.javaVisitor")));
        assert!(!rule.matches(&name("org.acme.java.YamlVisitor")));
        assert!(!rule.matches(&name("org.acme.java.JavaVisitorImpl")));
        assert!(!rule.matches(&name("org.acme.JavaVisitor")));
    }

    #[test]
    fn test_priority_and_tier() {
        let never = DelegationRule::NeverIsolated(PrefixSet::new());
        let host = DelegationRule::AlwaysHost(PrefixSet::new());
        let structural = DelegationRule::StructuralMatch(StructuralRule::tree_package());
        assert!(never.priority() < host.priority());
        assert!(host.priority() < structural.priority());
        assert_eq!(never.tier(), Tier::Isolated);
        assert_eq!(structural.tier(), Tier::Host);
    }
}
