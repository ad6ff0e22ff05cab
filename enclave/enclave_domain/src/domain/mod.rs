//! Loading domains.

mod lazy;
mod loading;

pub use lazy::LazyDomain;
pub use loading::{DomainBuilder, LoadingDomain};
