//! Archives: units of deployable engine code.

mod bundle;
mod directory;
#[cfg(feature = "dylib")]
mod dylib;
mod set;

pub use bundle::{BundleArchive, BundleBuilder};
pub use directory::DirectoryArchive;
#[cfg(feature = "dylib")]
pub use dylib::{ArchiveEntryFn, DylibArchive, ENTRY_SYMBOL};
pub use set::ArchiveSet;

use enclave_core::{LoadedUnit, Resource, TypeName};

/// A source of type definitions and resources for the isolated tier.
pub trait Archive: Send + Sync {
    /// Where the archive lives. Used to deduplicate archive sets.
    fn location(&self) -> &str;

    /// Define a unit for `name`.
    ///
    /// Every call returns a fresh unit; the domain's cache is what makes
    /// repeated resolution return the same one.
    fn define(&self, name: &TypeName) -> Option<LoadedUnit>;

    /// Find a resource by name.
    fn find_resource(&self, name: &str) -> Option<Resource>;

    /// Names of all types this archive can define.
    fn unit_names(&self) -> Vec<TypeName>;

    /// Names of all resources in this archive.
    fn resource_names(&self) -> Vec<String>;
}
