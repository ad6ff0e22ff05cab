//! The isolated loading domain.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use enclave_core::error::{LoadError, Result};
use enclave_core::{
    LoadedUnit, Resource, SessionId, Tier, TypeName, UnitProvider, UnitResolver,
};
use enclave_policy::DelegationPolicy;

use crate::archive::ArchiveSet;
use crate::provider::{IsolatedProvider, RegistryProvider};

/// Resolves types and resources for one session.
///
/// The domain asks the tier the policy names first and falls back through
/// the others:
///
/// | policy says | order                       |
/// |-------------|-----------------------------|
/// | system      | system, isolated, host      |
/// | host        | host, isolated, system      |
/// | isolated    | isolated, host, system      |
///
/// Resolved units are memoized first-writer-wins. Two threads racing on the
/// same name may both define a unit; only the first one stored is ever
/// returned.
pub struct LoadingDomain {
    session: SessionId,
    created_at: DateTime<Utc>,
    policy: DelegationPolicy,
    system: Arc<dyn UnitProvider>,
    host: Arc<dyn UnitProvider>,
    isolated: IsolatedProvider,
    units: DashMap<TypeName, Arc<LoadedUnit>>,
    resources: DashMap<String, Arc<[Resource]>>,
}

impl LoadingDomain {
    /// Start building a domain.
    pub fn builder() -> DomainBuilder {
        DomainBuilder::default()
    }

    /// The session this domain belongs to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// When the domain was built.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The delegation policy.
    pub fn policy(&self) -> &DelegationPolicy {
        &self.policy
    }

    /// The isolated archive set.
    pub fn archives(&self) -> &ArchiveSet {
        self.isolated.archives()
    }

    /// Number of units resolved so far.
    pub fn resolved_count(&self) -> usize {
        self.units.len()
    }

    /// The order in which tiers are asked for a type classified as `tier`.
    pub fn search_order(tier: Tier) -> [Tier; 3] {
        match tier {
            Tier::System => [Tier::System, Tier::Isolated, Tier::Host],
            Tier::Host => [Tier::Host, Tier::Isolated, Tier::System],
            Tier::Isolated => [Tier::Isolated, Tier::Host, Tier::System],
        }
    }

    /// Resolve a type name.
    ///
    /// # Returns
    ///
    /// * `Ok(unit)` - the same `Arc` for every call with the same name.
    /// * `Err(LoadError::TypeNotFound)` - listing the tiers searched.
    pub fn resolve_type(&self, name: &TypeName) -> Result<Arc<LoadedUnit>> {
        if let Some(unit) = self.units.get(name).map(|entry| Arc::clone(entry.value())) {
            return Ok(unit);
        }

        let classified = self.policy.classify(name);
        let order = Self::search_order(classified);
        for tier in order {
            let Some(unit) = self.provider(tier).load_unit(name) else {
                continue;
            };
            if tier == classified {
                debug!(name = %name, tier = %tier, "resolved");
            } else {
                debug!(name = %name, classified = %classified, tier = %tier, "resolved by fallback");
            }
            let stored = Arc::clone(self.units.entry(name.clone()).or_insert(unit).value());
            return Ok(stored);
        }

        Err(LoadError::TypeNotFound {
            name: name.to_string(),
            searched: order.to_vec(),
        }
        .into())
    }

    /// Resolve a type name given as a string.
    pub fn resolve(&self, name: &str) -> Result<Arc<LoadedUnit>> {
        self.resolve_type(&TypeName::new(name)?)
    }

    /// Find the first resource called `name`: system, then isolated, then
    /// host.
    pub fn resolve_resource(&self, name: &str) -> Result<Resource> {
        self.resource_tiers()
            .into_iter()
            .find_map(|provider| provider.find_resource(name))
            .ok_or_else(|| LoadError::ResourceNotFound(name.to_string()).into())
    }

    /// Find every resource called `name`, concatenated system, isolated,
    /// host. Duplicates are kept.
    pub fn resolve_resources(&self, name: &str) -> Vec<Resource> {
        if let Some(found) = self.resources.get(name).map(|entry| Arc::clone(entry.value())) {
            return found.to_vec();
        }

        let found: Arc<[Resource]> = self
            .resource_tiers()
            .into_iter()
            .flat_map(|provider| provider.find_resources(name))
            .collect();
        debug!(name, count = found.len(), "aggregated resources");
        let stored = Arc::clone(self.resources.entry(name.to_string()).or_insert(found).value());
        stored.to_vec()
    }

    fn resource_tiers(&self) -> [&dyn UnitProvider; 3] {
        [self.system.as_ref(), &self.isolated, self.host.as_ref()]
    }

    fn provider(&self, tier: Tier) -> &dyn UnitProvider {
        match tier {
            Tier::System => self.system.as_ref(),
            Tier::Host => self.host.as_ref(),
            Tier::Isolated => &self.isolated,
        }
    }
}

impl UnitResolver for LoadingDomain {
    fn resolve_unit(&self, name: &TypeName) -> Result<Arc<LoadedUnit>> {
        self.resolve_type(name)
    }
}

impl fmt::Debug for LoadingDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingDomain")
            .field("session", &self.session)
            .field("created_at", &self.created_at)
            .field("archives", self.isolated.archives())
            .field("resolved", &self.units.len())
            .finish()
    }
}

/// Builder for [`LoadingDomain`].
#[derive(Default)]
pub struct DomainBuilder {
    policy: Option<DelegationPolicy>,
    system: Option<Arc<dyn UnitProvider>>,
    host: Option<Arc<dyn UnitProvider>>,
    archives: ArchiveSet,
}

impl DomainBuilder {
    /// Set the delegation policy. Defaults to [`DelegationPolicy::default`].
    pub fn policy(mut self, policy: DelegationPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the system tier. Defaults to an empty registry.
    pub fn system(mut self, provider: Arc<dyn UnitProvider>) -> Self {
        self.system = Some(provider);
        self
    }

    /// Set the host tier. Defaults to an empty registry.
    pub fn host(mut self, provider: Arc<dyn UnitProvider>) -> Self {
        self.host = Some(provider);
        self
    }

    /// Set the isolated archive set.
    pub fn archives(mut self, archives: ArchiveSet) -> Self {
        self.archives = archives;
        self
    }

    /// Build the domain, starting a new session.
    pub fn build(self) -> LoadingDomain {
        let domain = LoadingDomain {
            session: SessionId::new(),
            created_at: Utc::now(),
            policy: self.policy.unwrap_or_default(),
            system: self
                .system
                .unwrap_or_else(|| Arc::new(RegistryProvider::empty(Tier::System))),
            host: self
                .host
                .unwrap_or_else(|| Arc::new(RegistryProvider::empty(Tier::Host))),
            isolated: IsolatedProvider::new(self.archives),
            units: DashMap::new(),
            resources: DashMap::new(),
        };
        info!(
            "Started loading domain {} with {} archives",
            domain.session,
            domain.archives().len()
        );
        domain
    }
}
