//! Tier providers.

mod isolated;
mod registry;

pub use isolated::IsolatedProvider;
pub use registry::{RegistryBuilder, RegistryProvider};
