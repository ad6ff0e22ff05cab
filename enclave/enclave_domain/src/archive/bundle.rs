//! In-memory archives.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use enclave_core::error::{ArchiveError, Result};
use enclave_core::{
    LoadedUnit, MemberTable, MemberTableBuilder, Origin, Resource, ResourceSource, Tier, TypeName,
};

use super::Archive;

/// An archive whose tables and resources are held in memory.
///
/// Statically linked engines and dynamic libraries both describe their
/// contents through a [`BundleBuilder`].
pub struct BundleArchive {
    location: String,
    units: BTreeMap<TypeName, Arc<MemberTable>>,
    resources: BTreeMap<String, Arc<[u8]>>,
}

impl BundleArchive {
    /// Start describing a bundle at `location`.
    pub fn builder(location: impl Into<String>) -> BundleBuilder {
        BundleBuilder {
            location: location.into(),
            units: BTreeMap::new(),
            resources: BTreeMap::new(),
            anchor: None,
            error: None,
        }
    }
}

impl Archive for BundleArchive {
    fn location(&self) -> &str {
        &self.location
    }

    fn define(&self, name: &TypeName) -> Option<LoadedUnit> {
        self.units.get(name).map(|table| {
            LoadedUnit::define(
                name.clone(),
                Arc::clone(table),
                Origin {
                    tier: Tier::Isolated,
                    location: self.location.clone(),
                },
            )
        })
    }

    fn find_resource(&self, name: &str) -> Option<Resource> {
        self.resources.get(name).map(|bytes| {
            Resource::new(
                name,
                Tier::Isolated,
                self.location.clone(),
                ResourceSource::Memory(Arc::clone(bytes)),
            )
        })
    }

    fn unit_names(&self) -> Vec<TypeName> {
        self.units.keys().cloned().collect()
    }

    fn resource_names(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }
}

/// Builder for [`BundleArchive`].
///
/// Errors (malformed names or descriptors) are reported by
/// [`build`](BundleBuilder::build).
pub struct BundleBuilder {
    location: String,
    units: BTreeMap<TypeName, Arc<MemberTable>>,
    resources: BTreeMap<String, Arc<[u8]>>,
    anchor: Option<Arc<dyn Any + Send + Sync>>,
    error: Option<enclave_core::Error>,
}

impl BundleBuilder {
    /// Add a type. A later definition of the same name replaces the earlier.
    pub fn unit(mut self, name: &str, table: MemberTableBuilder) -> Self {
        self.add_unit(name, table);
        self
    }

    /// Add a type through a mutable reference.
    pub fn add_unit(&mut self, name: &str, table: MemberTableBuilder) {
        let table = match &self.anchor {
            Some(anchor) => table.anchor(Arc::clone(anchor)),
            None => table,
        };
        let built = TypeName::new(name).and_then(|name| Ok((name, table.build()?)));
        match built {
            Ok((name, table)) => {
                self.units.insert(name, Arc::new(table));
            }
            Err(e) => self.fail(e),
        }
    }

    /// Add a resource.
    pub fn resource(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.add_resource(name, bytes);
        self
    }

    /// Add a resource through a mutable reference.
    pub fn add_resource(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.resources
            .insert(name.to_string(), Arc::from(bytes.into().into_boxed_slice()));
    }

    /// Keep `anchor` alive for as long as any table added afterwards.
    pub fn anchor(mut self, anchor: Arc<dyn Any + Send + Sync>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Finish the bundle.
    pub fn build(self) -> Result<BundleArchive> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.location.is_empty() {
            return Err(ArchiveError::Unsupported(self.location.into()).into());
        }
        Ok(BundleArchive {
            location: self.location,
            units: self.units,
            resources: self.resources,
        })
    }

    fn fail(&mut self, error: enclave_core::Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enclave_core::Value;

    fn recipe() -> MemberTableBuilder {
        MemberTable::builder().method("getName", &[], "str", |_, _| Ok(Value::from("r")))
    }

    #[test]
    fn test_define_is_fresh_each_time() {
        let bundle = BundleArchive::builder("mem:a")
            .unit("engine.Recipe", recipe())
            .build()
            .unwrap();
        let name = TypeName::new("engine.Recipe").unwrap();
        let a = bundle.define(&name).unwrap();
        let b = bundle.define(&name).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.origin().location, "mem:a");
        assert!(bundle.define(&TypeName::new("engine.Other").unwrap()).is_none());
    }

    #[test]
    fn test_bad_name_fails_build() {
        let result = BundleArchive::builder("mem:a").unit("engine..Recipe", recipe()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_resources() {
        let bundle = BundleArchive::builder("mem:a")
            .resource("META-INF/rewrite/a.yml", "type: x")
            .build()
            .unwrap();
        let res = bundle.find_resource("META-INF/rewrite/a.yml").unwrap();
        assert_eq!(res.read_to_string().unwrap(), "type: x");
        assert_eq!(res.tier(), Tier::Isolated);
        assert_eq!(bundle.resource_names(), vec!["META-INF/rewrite/a.yml"]);
    }
}
