//! Archives backed by dynamic libraries.
//!
//! A library archive exports one function under [`ENTRY_SYMBOL`] with the
//! signature [`ArchiveEntryFn`]. The host calls it once with a
//! [`BundleBuilder`] to collect the library's member tables and resources.
//! Libraries must be built with the same toolchain and the same
//! `enclave_core` version as the host, since tables cross as Rust values.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};
use tracing::info;

use enclave_core::error::{ArchiveError, Result};
use enclave_core::{LoadedUnit, Resource, TypeName};

use super::bundle::{BundleArchive, BundleBuilder};
use super::Archive;

/// Exported entry point name.
pub const ENTRY_SYMBOL: &[u8] = b"enclave_archive_entry";

/// Signature of the exported entry point.
pub type ArchiveEntryFn = fn(&mut BundleBuilder) -> std::result::Result<(), String>;

/// An archive loaded from a shared library.
///
/// Every table defined by the library holds a reference to it, so the
/// library stays mapped until the last unit and handle are gone.
pub struct DylibArchive {
    path: PathBuf,
    bundle: BundleArchive,
}

impl DylibArchive {
    /// Load a library and run its entry point.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let location = path.display().to_string();

        // SAFETY: loading runs the library's initialisers; archives are
        // trusted engine code chosen by the host configuration.
        let library = unsafe { Library::new(&path) }.map_err(|e| ArchiveError::Open {
            location: path.clone(),
            reason: e.to_string(),
        })?;
        let library = Arc::new(library);

        let mut builder = BundleArchive::builder(location).anchor(library.clone());
        {
            // SAFETY: the symbol is declared with `ArchiveEntryFn` by the
            // library and is only called while `library` is alive.
            let entry: Symbol<ArchiveEntryFn> =
                unsafe { library.get(ENTRY_SYMBOL) }.map_err(|e| ArchiveError::EntryPoint {
                    location: path.clone(),
                    reason: e.to_string(),
                })?;
            entry(&mut builder).map_err(|reason| ArchiveError::EntryPoint {
                location: path.clone(),
                reason,
            })?;
        }

        let bundle = builder.build()?;
        info!(
            "Loaded library archive {} ({} units)",
            path.display(),
            bundle.unit_names().len()
        );
        Ok(Self { path, bundle })
    }

    /// The library path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether a path looks like a shared library for this platform.
    pub fn is_library(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == std::env::consts::DLL_EXTENSION)
            .unwrap_or(false)
    }
}

impl Archive for DylibArchive {
    fn location(&self) -> &str {
        self.bundle.location()
    }

    fn define(&self, name: &TypeName) -> Option<LoadedUnit> {
        self.bundle.define(name)
    }

    fn find_resource(&self, name: &str) -> Option<Resource> {
        self.bundle.find_resource(name)
    }

    fn unit_names(&self) -> Vec<TypeName> {
        self.bundle.unit_names()
    }

    fn resource_names(&self) -> Vec<String> {
        self.bundle.resource_names()
    }
}
