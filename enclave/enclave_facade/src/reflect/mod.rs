//! Reflective dispatch.

pub mod contract;
mod reflector;

pub use contract::Call;
pub use reflector::Reflector;
