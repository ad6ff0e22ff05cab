//! # Enclave Policy
//!
//! `enclave_policy` decides, for every type name, which tier of a loading
//! domain should be asked first: the system runtime, the host registry, or
//! the isolated archive set.
//!
//! Key concepts:
//!
//! 1. **Prefix Set**: a list of plain string prefixes matched against the
//!    full dotted name.
//!
//! 2. **Delegation Rule**: `NeverIsolated`, `AlwaysHost` or a structural
//!    match on name segments. Rules have a fixed priority that does not
//!    depend on the order they were added in.
//!
//! 3. **Decision**: the tier plus the rule that decided it.
//!
//! Classification is total and never fails: a name no rule matches is
//! isolated. The structural rules stand in for type-hierarchy knowledge that
//! cannot be had without loading the very types being classified.

pub mod engine;
pub mod model;

pub use engine::{DelegationPolicy, PolicyBuilder};
pub use model::{Decision, DelegationRule, PrefixSet, Reason, StructuralRule};
