//! Resources found in a tier.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::types::tier::Tier;

/// Where the bytes of a resource come from.
#[derive(Clone)]
pub enum ResourceSource {
    /// Bytes held in memory.
    Memory(Arc<[u8]>),

    /// A file on disk, read on demand.
    File(PathBuf),
}

/// A named resource and the tier it was found in.
#[derive(Clone)]
pub struct Resource {
    name: String,
    tier: Tier,
    location: String,
    source: ResourceSource,
}

impl Resource {
    /// Create a resource.
    pub fn new(
        name: impl Into<String>,
        tier: Tier,
        location: impl Into<String>,
        source: ResourceSource,
    ) -> Self {
        Self {
            name: name.into(),
            tier,
            location: location.into(),
            source,
        }
    }

    /// The resource name, e.g. `META-INF/rewrite/recipes.yml`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tier that supplied the resource.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// The archive or registry location that holds it.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The byte source.
    pub fn source(&self) -> &ResourceSource {
        &self.source
    }

    /// Read the content.
    pub fn read(&self) -> Result<Vec<u8>> {
        match &self.source {
            ResourceSource::Memory(bytes) => Ok(bytes.to_vec()),
            ResourceSource::File(path) => Ok(std::fs::read(path)?),
        }
    }

    /// Read the content as UTF-8 text.
    pub fn read_to_string(&self) -> Result<String> {
        let bytes = self.read()?;
        String::from_utf8(bytes).map_err(|e| crate::error::Error::Serialization(e.to_string()))
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            ResourceSource::Memory(bytes) => format!("{} bytes in memory", bytes.len()),
            ResourceSource::File(path) => path.display().to_string(),
        };
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("tier", &self.tier)
            .field("location", &self.location)
            .field("source", &source)
            .finish()
    }
}
