//! Lazily built, resettable domains.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::info;

use enclave_core::error::Result;

use super::loading::LoadingDomain;

type Factory = dyn Fn() -> Result<LoadingDomain> + Send + Sync;

/// A domain that is built on first use and dropped at session end.
///
/// Concurrent first calls build the domain once. After
/// [`reset`](LazyDomain::reset) the next call builds a new domain (with a new
/// session id); handles and units from the old session stay valid for as
/// long as someone holds them.
pub struct LazyDomain {
    factory: Box<Factory>,
    cell: RwLock<OnceCell<Arc<LoadingDomain>>>,
}

impl LazyDomain {
    /// Create a lazy domain from a factory.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<LoadingDomain> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: RwLock::new(OnceCell::new()),
        }
    }

    /// Get the domain, building it if needed.
    pub fn get(&self) -> Result<Arc<LoadingDomain>> {
        let cell = self.cell.read();
        cell.get_or_try_init(|| (self.factory)().map(Arc::new))
            .map(Arc::clone)
    }

    /// Check whether the domain has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.read().get().is_some()
    }

    /// End the session, dropping this owner's reference to the domain.
    ///
    /// Returns the old domain, if one was built.
    pub fn reset(&self) -> Option<Arc<LoadingDomain>> {
        let old = self.cell.write().take();
        if let Some(domain) = &old {
            info!("Ended loading domain session {}", domain.session());
        }
        old
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_builds_once_and_again_after_reset() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let lazy = LazyDomain::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(LoadingDomain::builder().build())
        });

        assert!(!lazy.is_initialized());
        let first = lazy.get().unwrap();
        let again = lazy.get().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        let ended = lazy.reset().unwrap();
        assert_eq!(ended.session(), first.session());
        assert!(!lazy.is_initialized());

        let second = lazy.get().unwrap();
        assert_ne!(second.session(), first.session());
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_build_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let lazy = LazyDomain::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(enclave_core::Error::Config("first attempt".into()))
            } else {
                Ok(LoadingDomain::builder().build())
            }
        });
        assert!(lazy.get().is_err());
        assert!(lazy.get().is_ok());
    }
}
