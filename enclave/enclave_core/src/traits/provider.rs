//! Tier and resolver traits.
//!
//! A loading domain is assembled from three [`UnitProvider`]s, one per
//! [`Tier`]. Each provider only answers for itself; the order in which tiers
//! are consulted is decided by the domain, not by the providers.

use std::sync::Arc;

use crate::error::Result;
use crate::name::TypeName;
use crate::types::{LoadedUnit, Resource, Tier};

/// One tier of a loading domain.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enclave_core::{LoadedUnit, Resource, Tier, TypeName, UnitProvider};
///
/// struct EmptyTier;
///
/// impl UnitProvider for EmptyTier {
///     fn tier(&self) -> Tier {
///         Tier::System
///     }
///
///     fn load_unit(&self, _name: &TypeName) -> Option<Arc<LoadedUnit>> {
///         None
///     }
///
///     fn find_resource(&self, _name: &str) -> Option<Resource> {
///         None
///     }
///
///     fn find_resources(&self, _name: &str) -> Vec<Resource> {
///         Vec::new()
///     }
/// }
///
/// let name = TypeName::new("engine.Recipe").unwrap();
/// assert!(EmptyTier.load_unit(&name).is_none());
/// ```
pub trait UnitProvider: Send + Sync {
    /// The tier this provider stands for.
    fn tier(&self) -> Tier;

    /// Load a unit from this tier only.
    ///
    /// # Returns
    ///
    /// * `Some(unit)` if this tier can define the type.
    /// * `None` if it cannot; the domain then moves on to the next tier.
    fn load_unit(&self, name: &TypeName) -> Option<Arc<LoadedUnit>>;

    /// Find the first resource with the given name in this tier.
    fn find_resource(&self, name: &str) -> Option<Resource>;

    /// Find every resource with the given name in this tier, in archive order.
    fn find_resources(&self, name: &str) -> Vec<Resource>;
}

/// Resolves type names to loaded units.
///
/// Member bodies receive the resolver of the domain that defined them, so
/// engine code creating other engine objects stays inside its own domain.
pub trait UnitResolver: Send + Sync {
    /// Resolve a type name.
    ///
    /// # Returns
    ///
    /// * `Ok(unit)` - the unit, identical for repeated requests.
    /// * `Err(Error::Load(LoadError::TypeNotFound))` if no tier has it.
    fn resolve_unit(&self, name: &TypeName) -> Result<Arc<LoadedUnit>>;
}

impl<R: UnitResolver + ?Sized> UnitResolver for Arc<R> {
    fn resolve_unit(&self, name: &TypeName) -> Result<Arc<LoadedUnit>> {
        (**self).resolve_unit(name)
    }
}
