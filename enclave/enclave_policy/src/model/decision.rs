//! Classification outcomes.

use std::fmt;

use enclave_core::Tier;
use serde::Serialize;

/// Why a name was sent to its tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Reason {
    /// Part of the language runtime.
    System {
        /// The matching prefix
        prefix: String,
    },

    /// Listed as never isolated.
    NeverIsolated {
        /// The matching prefix
        prefix: String,
    },

    /// Listed as a shared host contract.
    AlwaysHost {
        /// The matching prefix
        prefix: String,
    },

    /// Selected by a structural rule.
    Structural {
        /// The rule name
        name: String,
    },

    /// No rule matched.
    Default,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System { prefix } => write!(f, "system prefix '{}'", prefix),
            Self::NeverIsolated { prefix } => write!(f, "never-isolated prefix '{}'", prefix),
            Self::AlwaysHost { prefix } => write!(f, "always-host prefix '{}'", prefix),
            Self::Structural { name } => write!(f, "structural rule '{}'", name),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The tier chosen for a name, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// The classified name
    pub name: String,

    /// The tier to ask first
    pub tier: Tier,

    /// The deciding rule
    pub reason: Reason,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.name, self.tier, self.reason)
    }
}
