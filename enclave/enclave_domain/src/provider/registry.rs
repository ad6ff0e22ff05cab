//! Registry-backed tiers.

use std::collections::BTreeMap;
use std::sync::Arc;

use enclave_core::error::Result;
use enclave_core::{
    LoadedUnit, MemberTableBuilder, Origin, Resource, ResourceSource, Tier, TypeName, UnitProvider,
};

/// A tier served from units registered up front.
///
/// Used for the system and host tiers. Units are defined once, when the
/// registry is built, so every domain sharing a registry sees the very same
/// unit for a name; this is what lets host contract objects flow between
/// sessions without conversion.
pub struct RegistryProvider {
    tier: Tier,
    location: String,
    units: BTreeMap<TypeName, Arc<LoadedUnit>>,
    resources: Vec<Resource>,
}

impl RegistryProvider {
    /// Start a registry for `tier`.
    pub fn builder(tier: Tier, location: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder {
            tier,
            location: location.into(),
            units: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// A registry with nothing in it.
    pub fn empty(tier: Tier) -> Self {
        Self {
            tier,
            location: tier.as_str().to_string(),
            units: BTreeMap::new(),
            resources: Vec::new(),
        }
    }

    /// The registry location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Registered type names.
    pub fn unit_names(&self) -> Vec<TypeName> {
        self.units.keys().cloned().collect()
    }
}

impl UnitProvider for RegistryProvider {
    fn tier(&self) -> Tier {
        self.tier
    }

    fn load_unit(&self, name: &TypeName) -> Option<Arc<LoadedUnit>> {
        self.units.get(name).cloned()
    }

    fn find_resource(&self, name: &str) -> Option<Resource> {
        self.resources.iter().find(|r| r.name() == name).cloned()
    }

    fn find_resources(&self, name: &str) -> Vec<Resource> {
        self.resources
            .iter()
            .filter(|r| r.name() == name)
            .cloned()
            .collect()
    }
}

/// Builder for [`RegistryProvider`].
pub struct RegistryBuilder {
    tier: Tier,
    location: String,
    units: Vec<(String, MemberTableBuilder)>,
    resources: Vec<(String, Vec<u8>)>,
}

impl RegistryBuilder {
    /// Register a type.
    pub fn unit(mut self, name: &str, table: MemberTableBuilder) -> Self {
        self.units.push((name.to_string(), table));
        self
    }

    /// Register a resource. Several resources may share a name.
    pub fn resource(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.resources.push((name.to_string(), bytes.into()));
        self
    }

    /// Define every registered unit.
    pub fn build(self) -> Result<RegistryProvider> {
        let origin = Origin {
            tier: self.tier,
            location: self.location.clone(),
        };

        let mut units = BTreeMap::new();
        for (name, table) in self.units {
            let name = TypeName::new(&name)?;
            let unit = LoadedUnit::define(name.clone(), Arc::new(table.build()?), origin.clone());
            units.insert(name, Arc::new(unit));
        }

        let resources = self
            .resources
            .into_iter()
            .map(|(name, bytes)| {
                Resource::new(
                    name,
                    self.tier,
                    self.location.clone(),
                    ResourceSource::Memory(Arc::from(bytes.into_boxed_slice())),
                )
            })
            .collect();

        Ok(RegistryProvider {
            tier: self.tier,
            location: self.location,
            units,
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enclave_core::{MemberTable, Value};

    #[test]
    fn test_units_are_shared() {
        let host = RegistryProvider::builder(Tier::Host, "host")
            .unit(
                "engine.ExecutionContext",
                MemberTable::builder().method("size", &[], "int", |_, _| Ok(Value::Int(0))),
            )
            .build()
            .unwrap();
        let name = TypeName::new("engine.ExecutionContext").unwrap();
        let a = host.load_unit(&name).unwrap();
        let b = host.load_unit(&name).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.origin().tier, Tier::Host);
    }

    #[test]
    fn test_resources_keep_duplicates() {
        let host = RegistryProvider::builder(Tier::Host, "host")
            .resource("META-INF/services/x", "a")
            .resource("META-INF/services/x", "b")
            .build()
            .unwrap();
        let found = host.find_resources("META-INF/services/x");
        assert_eq!(found.len(), 2);
        assert_eq!(host.find_resource("META-INF/services/x").unwrap().read().unwrap(), b"a");
    }
}
