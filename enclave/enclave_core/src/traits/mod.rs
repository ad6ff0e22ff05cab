//! Core traits at the seams of the enclave host.
//!
//! - `UnitProvider`: one tier of a loading domain (system, host, isolated)
//! - `UnitResolver`: anything that can turn a type name into a loaded unit
//! - `DynamicInvoke`: reflective calls on units that are unknown at compile time

pub mod invoke;
pub mod provider;

pub use invoke::DynamicInvoke;
pub use provider::{UnitProvider, UnitResolver};
