//! Common utilities for extinction tests
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use extinction::backend::{BackendError, BackendFactory, BackendKind, DustQuery, Options};
use extinction::dataset::{DatasetStore, FetchError};
use extinction::sky::SkyPosition;
use extinction::{MapContext, MapRegistry};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic stand-in for a survey: smooth in (l, b), linear in distance
pub fn synthetic_value(l_deg: f64, b_deg: f64, distance_kpc: Option<f64>) -> f64 {
    let column = 0.5 + 0.001 * l_deg + 0.01 * b_deg.abs();
    match distance_kpc {
        Some(d) => column * d,
        None => column,
    }
}

/// Everything the mock factory and its backends were asked to do
#[derive(Default)]
pub struct SurveyLog {
    pub constructions: Mutex<Vec<(BackendKind, Options)>>,
    pub queries: Mutex<Vec<Options>>,
}

impl SurveyLog {
    pub fn construction_count(&self) -> usize {
        self.constructions.lock().unwrap().len()
    }

    pub fn last_query_options(&self) -> Option<Options> {
        self.queries.lock().unwrap().last().cloned()
    }
}

pub struct MockSurvey {
    log: Arc<SurveyLog>,
}

impl DustQuery for MockSurvey {
    fn query(&self, position: &SkyPosition, options: &Options) -> Result<f64, BackendError> {
        self.log.queries.lock().unwrap().push(options.clone());
        if position.b_deg().abs() > 85.0 {
            return Err(BackendError::OutOfCoverage {
                l_deg: position.l_deg(),
                b_deg: position.b_deg(),
            });
        }
        Ok(synthetic_value(
            position.l_deg(),
            position.b_deg(),
            position.distance_kpc(),
        ))
    }
}

/// Factory building [`MockSurvey`] backends; `Custom("broken")` fails
pub struct MockFactory {
    pub log: Arc<SurveyLog>,
}

impl BackendFactory for MockFactory {
    fn construct(
        &self,
        kind: &BackendKind,
        options: &Options,
    ) -> Result<Arc<dyn DustQuery>, BackendError> {
        if *kind == BackendKind::Custom("broken".to_string()) {
            return Err(BackendError::Construction {
                backend: kind.to_string(),
                reason: "grid file truncated".to_string(),
            });
        }
        self.log
            .constructions
            .lock()
            .unwrap()
            .push((kind.clone(), options.clone()));
        Ok(Arc::new(MockSurvey {
            log: Arc::clone(&self.log),
        }))
    }
}

/// In-memory dataset store; clones share state so tests can inspect it
#[derive(Clone, Default)]
pub struct MockStore {
    installed: Arc<Mutex<HashSet<String>>>,
    fetchable: Arc<HashSet<String>>,
    fetch_calls: Arc<AtomicUsize>,
}

impl MockStore {
    /// Every identifier is installed
    pub fn everything_installed() -> Self {
        let store = Self::default();
        for id in MapRegistry::builtin().identifiers() {
            store.installed.lock().unwrap().insert(id.to_string());
        }
        store
    }

    /// Nothing installed; only `fetchable` identifiers can be downloaded
    pub fn with_fetchable(fetchable: &[&str]) -> Self {
        Self {
            fetchable: Arc::new(fetchable.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl DatasetStore for MockStore {
    fn is_present(&self, identifier: &str) -> bool {
        self.installed.lock().unwrap().contains(identifier)
    }

    fn fetch(&self, identifier: &str) -> Result<PathBuf, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fetchable.contains(identifier) {
            self.installed.lock().unwrap().insert(identifier.to_string());
            Ok(self.location(identifier))
        } else {
            Err(FetchError::NoSource {
                identifier: identifier.to_string(),
            })
        }
    }

    fn location(&self, identifier: &str) -> PathBuf {
        PathBuf::from("/mock/dustmaps").join(identifier)
    }
}

/// Context over the built-in registry with mock backends
pub fn mock_context(store: MockStore) -> (MapContext, Arc<SurveyLog>) {
    init_logging();
    let log = Arc::new(SurveyLog::default());
    let factory = MockFactory {
        log: Arc::clone(&log),
    };
    (MapContext::new(MapRegistry::builtin(), factory, store), log)
}
