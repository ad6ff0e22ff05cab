//! Delegation policy evaluation.

use enclave_core::utils::PolicyConfig;
use enclave_core::{Tier, TypeName};
use tracing::trace;

use crate::model::{Decision, DelegationRule, PrefixSet, Reason, StructuralRule};

/// Decides which tier resolves a type name.
///
/// The system prefix set is checked first. Rules are then evaluated in
/// priority order, `NeverIsolated` before `AlwaysHost` before structural
/// matches, whatever order they were added in; the first match decides.
/// Unmatched names are isolated.
///
/// # Examples
///
/// ```
/// use enclave_core::{Tier, TypeName};
/// use enclave_policy::DelegationPolicy;
///
/// let policy = DelegationPolicy::builder()
///     .always_host(["org.example."])
///     .never_isolated(["org.example.internal.MetricsHelper"])
///     .build();
///
/// let name = TypeName::new("org.example.internal.MetricsHelper").unwrap();
/// assert_eq!(policy.classify(&name), Tier::Isolated);
/// ```
#[derive(Debug, Clone)]
pub struct DelegationPolicy {
    system: PrefixSet,
    rules: Vec<DelegationRule>,
}

impl DelegationPolicy {
    /// Start building a policy with no rules.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Build a policy from configuration.
    pub fn from_config(config: &PolicyConfig) -> Self {
        let mut builder = Self::builder()
            .system(config.system.iter().cloned())
            .never_isolated(config.never_isolated.iter().cloned())
            .always_host(config.always_host.iter().cloned());
        for kind in &config.structural {
            builder = builder.structural(StructuralRule::from(*kind));
        }
        builder.build()
    }

    /// Classify a name.
    pub fn classify(&self, name: &TypeName) -> Tier {
        self.explain(name).tier
    }

    /// Classify a name and report which rule decided.
    pub fn explain(&self, name: &TypeName) -> Decision {
        let (tier, reason) = self.decide(name);
        trace!(name = %name, tier = %tier, reason = %reason, "classified");
        Decision {
            name: name.to_string(),
            tier,
            reason,
        }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[DelegationRule] {
        &self.rules
    }

    /// The system prefixes.
    pub fn system_prefixes(&self) -> &PrefixSet {
        &self.system
    }

    fn decide(&self, name: &TypeName) -> (Tier, Reason) {
        if let Some(prefix) = self.system.matching(name) {
            return (
                Tier::System,
                Reason::System {
                    prefix: prefix.to_string(),
                },
            );
        }

        for rule in &self.rules {
            let Some(hit) = rule.matching(name) else {
                continue;
            };
            let reason = match rule {
                DelegationRule::NeverIsolated(_) => Reason::NeverIsolated {
                    prefix: hit.to_string(),
                },
                DelegationRule::AlwaysHost(_) => Reason::AlwaysHost {
                    prefix: hit.to_string(),
                },
                DelegationRule::StructuralMatch(_) => Reason::Structural {
                    name: hit.to_string(),
                },
            };
            return (rule.tier(), reason);
        }

        (Tier::Isolated, Reason::Default)
    }
}

impl Default for DelegationPolicy {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}

/// Builder for [`DelegationPolicy`].
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    system: PrefixSet,
    never_isolated: PrefixSet,
    always_host: PrefixSet,
    rules: Vec<DelegationRule>,
}

impl PolicyBuilder {
    /// Add system prefixes.
    pub fn system<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            self.system.insert(prefix);
        }
        self
    }

    /// Add never-isolated prefixes.
    pub fn never_isolated<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            self.never_isolated.insert(prefix);
        }
        self
    }

    /// Add always-host prefixes.
    pub fn always_host<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            self.always_host.insert(prefix);
        }
        self
    }

    /// Add a structural rule.
    pub fn structural(mut self, rule: StructuralRule) -> Self {
        self.rules.push(DelegationRule::StructuralMatch(rule));
        self
    }

    /// Add an arbitrary rule.
    pub fn rule(mut self, rule: DelegationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Finish the policy, ordering rules by priority.
    pub fn build(self) -> DelegationPolicy {
        let mut rules = Vec::with_capacity(self.rules.len() + 2);
        if !self.never_isolated.is_empty() {
            rules.push(DelegationRule::NeverIsolated(self.never_isolated));
        }
        if !self.always_host.is_empty() {
            rules.push(DelegationRule::AlwaysHost(self.always_host));
        }
        rules.extend(self.rules);
        rules.sort_by_key(DelegationRule::priority);

        DelegationPolicy {
            system: self.system,
            rules,
        }
    }
}
