//! Ordered archive sets.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enclave_core::error::{ArchiveError, Result};
use enclave_core::Resource;
use tracing::debug;

use super::directory::DirectoryArchive;
#[cfg(feature = "dylib")]
use super::dylib::DylibArchive;
use super::Archive;

/// An ordered collection of archives, unique by location.
///
/// Order is resolution order: the first archive that defines a type or
/// holds a resource wins.
#[derive(Clone, Default)]
pub struct ArchiveSet {
    archives: Vec<Arc<dyn Archive>>,
}

impl ArchiveSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open archives from paths, in order.
    ///
    /// Directories become [`DirectoryArchive`]s; shared libraries become
    /// library archives when the `dylib` feature is enabled. Paths that name
    /// the same location twice are opened once.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut set = Self::new();
        for path in paths {
            let path = path.as_ref();
            if set.contains(&path.display().to_string()) {
                debug!("Skipping duplicate archive {}", path.display());
                continue;
            }
            set.push(open_one(path)?);
        }
        Ok(set)
    }

    /// Build a set from already opened archives.
    pub fn from_archives<I>(archives: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Archive>>,
    {
        let mut set = Self::new();
        for archive in archives {
            set.push(archive);
        }
        set
    }

    /// Append an archive unless its location is already present.
    ///
    /// Returns `false` for a duplicate.
    pub fn push(&mut self, archive: Arc<dyn Archive>) -> bool {
        if self.contains(archive.location()) {
            return false;
        }
        self.archives.push(archive);
        true
    }

    /// Check whether an archive with this location is present.
    pub fn contains(&self, location: &str) -> bool {
        self.archives.iter().any(|a| a.location() == location)
    }

    /// Iterate over the archives in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Archive>> {
        self.archives.iter()
    }

    /// Archive locations in order.
    pub fn locations(&self) -> Vec<String> {
        self.archives.iter().map(|a| a.location().to_string()).collect()
    }

    /// Number of archives.
    pub fn len(&self) -> usize {
        self.archives.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Every resource called `name`, in archive order.
    pub fn find_resources(&self, name: &str) -> Vec<Resource> {
        self.archives
            .iter()
            .filter_map(|a| a.find_resource(name))
            .collect()
    }
}

impl fmt::Debug for ArchiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.locations()).finish()
    }
}

fn open_one(path: &Path) -> Result<Arc<dyn Archive>> {
    if !path.exists() {
        return Err(ArchiveError::Open {
            location: PathBuf::from(path),
            reason: "no such file or directory".to_string(),
        }
        .into());
    }

    if path.is_dir() {
        return Ok(Arc::new(DirectoryArchive::open(path)?));
    }

    #[cfg(feature = "dylib")]
    if DylibArchive::is_library(path) {
        return Ok(Arc::new(DylibArchive::open(path)?));
    }

    Err(ArchiveError::Unsupported(PathBuf::from(path)).into())
}
