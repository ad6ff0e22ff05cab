//! Resolution tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The namespace a type or resource is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The language runtime itself.
    System,

    /// The host process's own registry.
    Host,

    /// The private archive set of a loading domain.
    Isolated,
}

impl Tier {
    /// Get the lowercase name of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Host => "host",
            Self::Isolated => "isolated",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
