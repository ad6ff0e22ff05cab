//! # Enclave Domain
//!
//! `enclave_domain` provides the isolated loading domain: an explicitly owned
//! object that resolves type names and resources through three tiers.
//!
//! - **system**: the language runtime
//! - **host**: shared contract types registered by the host process
//! - **isolated**: the domain's private, ordered archive set
//!
//! The [`DelegationPolicy`](enclave_policy::DelegationPolicy) decides which
//! tier is asked first; the domain falls back through the others in a fixed
//! order, because the policy is a hint and not a guarantee that the type is
//! present where it points. Resolved units are cached, so resolving a name
//! twice always yields the same unit.
//!
//! There is no process-wide loader. Every session builds its own domain,
//! optionally through a [`LazyDomain`], and drops it when the session ends.

pub mod archive;
pub mod domain;
pub mod provider;

pub use archive::{Archive, ArchiveSet, BundleArchive, BundleBuilder, DirectoryArchive};
#[cfg(feature = "dylib")]
pub use archive::DylibArchive;
pub use domain::{DomainBuilder, LazyDomain, LoadingDomain};
pub use provider::{IsolatedProvider, RegistryBuilder, RegistryProvider};
