//! # Enclave Core
//!
//! `enclave_core` provides the building blocks shared by every part of the
//! enclave engine host: error types, identifiers, the object model that
//! crosses the isolation boundary, and the traits that the loading domain and
//! the invocation facade meet at.
//!
//! ## Core Principles
//!
//! 1. **Explicit Ownership of Resolution State**: there is no process-wide
//!    loader. A loading domain is an ordinary value, owned by whoever builds
//!    it and passed by reference to everything that resolves types through it.
//!
//! 2. **Names Instead of Types**: the host never links against the engine.
//!    Types are addressed by [`TypeName`], members by name plus a list of
//!    [`Shape`] descriptors, and objects by opaque [`Handle`]s.
//!
//! 3. **Uniform Failures**: every failure that crosses the boundary is an
//!    [`Error`], so consumers never special-case how a call was dispatched.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all enclave components
//! - **id**: Strongly-typed identifier types
//! - **name**: Dotted type names
//! - **traits**: Seams between providers, domains and invokers
//! - **types**: The boundary object model (units, members, values, handles)
//! - **utils**: Logging and configuration helpers

pub mod error;
pub mod id;
pub mod name;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export key types and traits for convenience
pub use error::{
    ArchiveError, BoundaryError, DispatchCause, DispatchError, Error, Fault, LoadError, Result,
};
pub use id::{InstanceId, SessionId, UnitId};
pub use name::TypeName;
pub use traits::{DynamicInvoke, UnitProvider, UnitResolver};
pub use types::{
    CallContext, Handle, LoadedUnit, Member, MemberKind, MemberTable, Origin, Resource,
    ResourceSource, Shape, Tier, Value,
};
pub use utils::{EnclaveConfig, LogLevel};
pub use types::{MemberTableBuilder, CONSTRUCTOR};
