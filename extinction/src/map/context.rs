//! Shared state behind every map adapter
//!
//! A [`MapContext`] is created once by the pipeline and passed by reference to
//! every adapter it opens. It owns the registry, the backend cache, the
//! backend factory and the dataset store, so tests can build isolated
//! contexts without touching any global state.

use std::sync::{Mutex, PoisonError};

use log::{debug, info};

use super::{EvaluationMode, MapAdapter};
use crate::backend::{BackendCache, BackendFactory, BackendHandle};
use crate::config::ExtinctionConfig;
use crate::dataset::{DatasetStore, LocalDataStore};
use crate::error::{ExtinctionError, Result, DATA_DOCS_URL};
use crate::registry::{MapRegistry, MapRegistryEntry};

pub struct MapContext {
    registry: MapRegistry,
    cache: BackendCache,
    factory: Box<dyn BackendFactory>,
    store: Box<dyn DatasetStore>,
    default_mode: EvaluationMode,
    /// Serializes dataset fetches so one missing map is downloaded once
    fetch_lock: Mutex<()>,
}

impl MapContext {
    pub fn new(
        registry: MapRegistry,
        factory: impl BackendFactory + 'static,
        store: impl DatasetStore + 'static,
    ) -> Self {
        Self {
            registry,
            cache: BackendCache::new(),
            factory: Box::new(factory),
            store: Box::new(store),
            default_mode: EvaluationMode::default(),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Built-in registry with an on-disk dataset store described by `config`
    pub fn from_config(config: &ExtinctionConfig, factory: impl BackendFactory + 'static) -> Self {
        Self::new(
            MapRegistry::builtin(),
            factory,
            LocalDataStore::from_config(config),
        )
        .with_default_mode(config.evaluation_mode)
    }

    pub fn with_default_mode(mut self, mode: EvaluationMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn registry(&self) -> &MapRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &BackendCache {
        &self.cache
    }

    pub fn store(&self) -> &dyn DatasetStore {
        self.store.as_ref()
    }

    pub fn default_mode(&self) -> EvaluationMode {
        self.default_mode
    }

    /// Open an adapter in the context's default evaluation mode
    pub fn open(&self, identifier: &str) -> Result<MapAdapter> {
        MapAdapter::new(identifier, self.default_mode, self)
    }

    /// Open an adapter in an explicit evaluation mode
    pub fn open_with_mode(&self, identifier: &str, mode: EvaluationMode) -> Result<MapAdapter> {
        MapAdapter::new(identifier, mode, self)
    }

    /// Backend for a resolved entry, making sure its data is installed first.
    pub(crate) fn backend_for(&self, entry: &MapRegistryEntry) -> Result<BackendHandle> {
        let identifier = entry.identifier();

        // A cached backend has already loaded its data
        if !self.cache.contains(identifier) {
            self.ensure_dataset(identifier)?;
        }

        Ok(self.cache.obtain(
            identifier,
            entry.backend(),
            entry.options(),
            self.factory.as_ref(),
        )?)
    }

    fn ensure_dataset(&self, identifier: &str) -> Result<()> {
        if self.store.is_present(identifier) {
            return Ok(());
        }

        let _guard = self.fetch_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.store.is_present(identifier) {
            debug!("Dataset for '{identifier}' was installed by a concurrent fetch");
            return Ok(());
        }

        info!(
            "Dataset for '{identifier}' not found at {}",
            self.store.location(identifier).display()
        );
        match self.store.fetch(identifier) {
            Ok(path) => {
                info!("Installed dataset for '{identifier}' at {}", path.display());
                Ok(())
            }
            Err(source) => Err(ExtinctionError::DataUnavailable {
                identifier: identifier.to_string(),
                instructions: self.store.fetch_instructions(identifier),
                docs_url: DATA_DOCS_URL,
                source,
            }),
        }
    }
}
