//! The isolated tier.

use std::sync::Arc;

use enclave_core::{LoadedUnit, Resource, Tier, TypeName, UnitProvider};
use tracing::trace;

use crate::archive::ArchiveSet;

/// Serves types and resources from a domain's private archive set.
///
/// Units are defined afresh on every load; the owning domain caches them.
pub struct IsolatedProvider {
    archives: ArchiveSet,
}

impl IsolatedProvider {
    /// Create a provider over an archive set.
    pub fn new(archives: ArchiveSet) -> Self {
        Self { archives }
    }

    /// The archive set.
    pub fn archives(&self) -> &ArchiveSet {
        &self.archives
    }
}

impl UnitProvider for IsolatedProvider {
    fn tier(&self) -> Tier {
        Tier::Isolated
    }

    fn load_unit(&self, name: &TypeName) -> Option<Arc<LoadedUnit>> {
        self.archives.iter().find_map(|archive| {
            let unit = archive.define(name)?;
            trace!(name = %name, archive = archive.location(), "defined");
            Some(Arc::new(unit))
        })
    }

    fn find_resource(&self, name: &str) -> Option<Resource> {
        self.archives.iter().find_map(|a| a.find_resource(name))
    }

    fn find_resources(&self, name: &str) -> Vec<Resource> {
        self.archives.find_resources(name)
    }
}
