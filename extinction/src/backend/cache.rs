//! Shared store of constructed dust-survey backends
//!
//! Loading a survey can mean reading gigabytes of density grids, and every
//! simulated population that uses a map asks for the same backend. The cache
//! keeps one backend per map identifier and hands out shared references to
//! it. Entries are never evicted; they live as long as the cache.
//!
//! The check-construct-insert sequence runs while holding the cache lock, so
//! adapters built from several threads still trigger a single construction.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use super::{BackendError, BackendFactory, BackendKind, DustQuery, Options};

/// Shared reference to a constructed backend
pub type BackendHandle = Arc<dyn DustQuery>;

/// Backend cache keyed by map identifier
#[derive(Default)]
pub struct BackendCache {
    /// Constructed backends (shared via Arc so adapters never clone survey data)
    backends: Mutex<HashMap<String, BackendHandle>>,

    /// Requests answered from the cache
    hits: AtomicUsize,

    /// Backends built by a factory
    constructions: AtomicUsize,
}

impl BackendCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the backend for `identifier`, building it on first request.
    ///
    /// # Arguments
    /// * `identifier` - Map identifier the backend is cached under
    /// * `kind` - Survey variant handed to the factory on a miss
    /// * `options` - Construction options handed to the factory on a miss
    /// * `factory` - Constructor used on a miss
    ///
    /// A failed construction leaves the cache unchanged.
    pub fn obtain(
        &self,
        identifier: &str,
        kind: &BackendKind,
        options: &Options,
        factory: &dyn BackendFactory,
    ) -> Result<BackendHandle, BackendError> {
        let mut backends = self.lock();

        if let Some(handle) = backends.get(identifier) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Reusing cached {kind} backend for '{identifier}'");
            return Ok(Arc::clone(handle));
        }

        if options.is_empty() {
            info!("Constructing {kind} backend for '{identifier}'");
        } else {
            info!("Constructing {kind} backend for '{identifier}' ({options})");
        }
        let handle = factory.construct(kind, options)?;
        backends.insert(identifier.to_string(), Arc::clone(&handle));
        self.constructions.fetch_add(1, Ordering::Relaxed);

        Ok(handle)
    }

    /// Cached backend for `identifier`, without constructing one
    pub fn get(&self, identifier: &str) -> Option<BackendHandle> {
        self.lock().get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.lock().contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Cached identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Get cache statistics for debugging
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached_backends: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            constructions: self.constructions.load(Ordering::Relaxed),
        }
    }

    // A panic inside a factory poisons the lock without inserting anything,
    // so the map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, BackendHandle>> {
        self.backends.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for BackendCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendCache")
            .field("identifiers", &self.identifiers())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Statistics about the cache state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub cached_backends: usize,
    pub hits: usize,
    pub constructions: usize,
}
