//! Configuration for the enclave host.
//!
//! Configuration is TOML. Every section has defaults, so an empty file is a
//! valid configuration:
//!
//! ```toml
//! [domain]
//! archives = ["engine/recipes.bundle", "engine/resources"]
//!
//! [domain.properties]
//! "engine.profile" = "ci"
//!
//! [domain.policy]
//! system = ["std.", "core."]
//! never_isolated = ["engine.internal.MetricsHelper"]
//! always_host = ["org.slf4j", "engine.internal", "engine.config.RecipeDescriptor"]
//! structural = ["tree-package", "visitor-tangle"]
//!
//! [[engine.shutdown_hooks]]
//! owner = "engine.internal.Caches"
//! member = "clear"
//!
//! [[engine.shutdown_hooks]]
//! owner = "engine.internal.Scheduler"
//! member = "shutdown"
//! optional = true
//!
//! [logging]
//! level = "debug"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::name::TypeName;
use crate::utils::logging::LogLevel;

/// Structural name rules that send a type to the host tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralKind {
    /// Fourth segment is `tree`, e.g. `org.acme.java.tree.J`.
    TreePackage,

    /// Fourth segment is `<third segment>Visitor`, e.g.
    /// `org.acme.java.JavaVisitor`.
    VisitorTangle,
}

/// Delegation policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Runtime prefixes, always resolved from the system tier first.
    #[serde(default = "default_system_prefixes")]
    pub system: Vec<String>,

    /// Prefixes always resolved from the isolated tier, even when the host
    /// defines the same name.
    #[serde(default)]
    pub never_isolated: Vec<String>,

    /// Prefixes resolved from the host tier.
    #[serde(default = "default_always_host")]
    pub always_host: Vec<String>,

    /// Structural rules to enable.
    #[serde(default = "default_structural")]
    pub structural: Vec<StructuralKind>,
}

fn default_system_prefixes() -> Vec<String> {
    vec!["std.".to_string(), "core.".to_string(), "alloc.".to_string()]
}

fn default_always_host() -> Vec<String> {
    vec![
        "engine.config.OptionDescriptor".to_string(),
        "engine.config.RecipeDescriptor".to_string(),
    ]
}

fn default_structural() -> Vec<StructuralKind> {
    vec![StructuralKind::TreePackage, StructuralKind::VisitorTangle]
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            system: default_system_prefixes(),
            never_isolated: Vec::new(),
            always_host: default_always_host(),
            structural: default_structural(),
        }
    }
}

/// Loading domain configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Archive locations, in resolution order.
    #[serde(default)]
    pub archives: Vec<PathBuf>,

    /// Properties handed to the engine environment.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Delegation policy.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// A static, no-argument engine member invoked at shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownHook {
    /// Owning type.
    pub owner: String,

    /// Static member name.
    pub member: String,

    /// Skip the hook when the engine does not ship its owner.
    #[serde(default)]
    pub optional: bool,
}

/// Engine session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cleanup members run by the facade's shutdown, in order.
    #[serde(default)]
    pub shutdown_hooks: Vec<ShutdownHook>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum level to emit.
    #[serde(default)]
    pub level: LogLevel,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnclaveConfig {
    /// Loading domain.
    #[serde(default)]
    pub domain: DomainConfig,

    /// Engine session.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EnclaveConfig {
    /// Load configuration from a file.
    ///
    /// With no path, or a path that does not exist, the defaults are used.
    /// The loaded configuration is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)?
            }
            Some(path) => {
                warn!("Configuration file not found: {}", path.display());
                Self::default()
            }
            None => {
                info!("No configuration file specified, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without validating it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let policy = &self.domain.policy;
        for (set, prefixes) in [
            ("system", &policy.system),
            ("never_isolated", &policy.never_isolated),
            ("always_host", &policy.always_host),
        ] {
            if prefixes.iter().any(String::is_empty) {
                return Err(Error::Config(format!(
                    "empty prefix in policy set '{}' would match every name",
                    set
                )));
            }
        }

        if let Some(archive) = self
            .domain
            .archives
            .iter()
            .find(|a| a.as_os_str().is_empty())
        {
            return Err(Error::Config(format!("empty archive location {:?}", archive)));
        }

        for hook in &self.engine.shutdown_hooks {
            TypeName::new(&hook.owner).map_err(|e| Error::Config(e.to_string()))?;
            if hook.member.is_empty() {
                return Err(Error::Config(format!(
                    "shutdown hook on {} has no member",
                    hook.owner
                )));
            }
        }

        Ok(())
    }

    /// Merge with another configuration.
    ///
    /// Lists from `other` are appended (archives are not duplicated),
    /// properties from `other` win, and the log level is taken from `other`.
    pub fn merge(&mut self, other: EnclaveConfig) {
        for archive in other.domain.archives {
            if !self.domain.archives.contains(&archive) {
                self.domain.archives.push(archive);
            }
        }

        self.domain.properties.extend(other.domain.properties);

        let policy = &mut self.domain.policy;
        let incoming = other.domain.policy;
        extend_unique(&mut policy.system, incoming.system);
        extend_unique(&mut policy.never_isolated, incoming.never_isolated);
        extend_unique(&mut policy.always_host, incoming.always_host);
        extend_unique(&mut policy.structural, incoming.structural);

        extend_unique(&mut self.engine.shutdown_hooks, other.engine.shutdown_hooks);

        self.logging.level = other.logging.level;
    }
}

fn extend_unique<T: PartialEq>(into: &mut Vec<T>, from: Vec<T>) {
    for item in from {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}
