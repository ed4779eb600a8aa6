//! Uniform adapters over dust-survey maps
//!
//! A [`MapAdapter`] is what a simulated population holds for each dust map it
//! needs. Opening one resolves the identifier in the registry, makes sure the
//! survey data is installed, and picks up the shared backend from the
//! context's cache. After that the adapter answers position (and, for 3-D
//! maps, distance) lookups.
//!
//! Adapters are evaluated in one of two modes, fixed when they are opened:
//!
//! * [`EvaluationMode::Deferred`] - `update` stores a [`SightLine`] that the
//!   caller evaluates at every distance slice along the current line of sight
//! * [`EvaluationMode::Immediate`] - `update` evaluates at the given radius
//!   and stores the number
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use extinction::backend::{BackendError, BackendKind, DustQuery, Options};
//! use extinction::{EvaluationMode, ExtinctionConfig, MapContext, SkyPosition};
//!
//! struct Uniform;
//!
//! impl DustQuery for Uniform {
//!     fn query(&self, position: &SkyPosition, _options: &Options) -> Result<f64, BackendError> {
//!         Ok(0.1 * position.distance_kpc().unwrap_or(1.0))
//!     }
//! }
//!
//! let factory = |_: &BackendKind, _: &Options| -> Result<Arc<dyn DustQuery>, BackendError> {
//!     Ok(Arc::new(Uniform))
//! };
//!
//! let context = MapContext::from_config(&ExtinctionConfig::default(), factory);
//! let mut map = context.open_with_mode("bayestar", EvaluationMode::Deferred)?;
//! map.update_line_of_sight(30.0, 5.0)?;
//! map.update(0.5)?;
//! if let Some(sight_line) = map.sight_line() {
//!     let e_bv_at_2kpc = sight_line.evaluate(2.0)?;
//!     println!("E(B-V) at 2 kpc: {e_bv_at_2kpc}");
//! }
//! # Ok::<(), extinction::ExtinctionError>(())
//! ```

mod context;
mod lookup;
mod state;

use std::sync::Arc;

use log::debug;
use ndarray::{Array1, ArrayView1};

pub use context::MapContext;
pub use state::{EvaluationMode, ExtinctionState, SightLine};

use crate::backend::BackendHandle;
use crate::error::{ConfigurationError, Result};
use crate::registry::{Dimensionality, MapQuantity, MapRegistryEntry};
use crate::sky::SkyPosition;
use lookup::MapQuery;

/// Per-population view of one dust map.
pub struct MapAdapter {
    entry: MapRegistryEntry,
    query: Arc<MapQuery>,
    mode: EvaluationMode,
    line_of_sight: Option<(f64, f64)>,
    state: ExtinctionState,
}

impl MapAdapter {
    /// Open the map `identifier` in `context`.
    ///
    /// # Errors
    /// * Configuration error if the identifier is unknown
    /// * Unsupported feature if the identifier is reserved
    /// * Data unavailable if the survey data is missing and cannot be fetched
    /// * Backend error if the backend cannot be constructed
    pub fn new(identifier: &str, mode: EvaluationMode, context: &MapContext) -> Result<Self> {
        let entry = context.registry().resolve(identifier)?.clone();
        let backend = context.backend_for(&entry)?;

        debug!(
            "Opened dustmaps.{identifier} ({}, returns {}, {:?} mode)",
            entry.dimensionality(),
            entry.returns(),
            mode
        );

        let query = Arc::new(MapQuery::new(
            identifier,
            entry.dimensionality(),
            backend,
            entry.query_options().clone(),
        ));

        Ok(Self {
            entry,
            query,
            mode,
            line_of_sight: None,
            state: ExtinctionState::Empty,
        })
    }

    /// Display name, `dustmaps.<identifier>`
    pub fn name(&self) -> String {
        format!("dustmaps.{}", self.entry.identifier())
    }

    pub fn identifier(&self) -> &str {
        self.entry.identifier()
    }

    pub fn entry(&self) -> &MapRegistryEntry {
        &self.entry
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.entry.dimensionality()
    }

    pub fn is_3d(&self) -> bool {
        self.entry.is_3d()
    }

    /// Label of the returned quantity, e.g. "E(B-V)"
    pub fn returns(&self) -> &str {
        self.entry.returns()
    }

    pub fn quantity(&self) -> MapQuantity {
        self.entry.quantity()
    }

    /// Reference wavelength(s) in µm; the second is present for color excesses
    pub fn reference_wavelengths(&self) -> (f64, Option<f64>) {
        let quantity = self.entry.quantity();
        (
            quantity.reference_wavelength(),
            quantity.second_reference_wavelength(),
        )
    }

    /// The shared backend this adapter queries
    pub fn backend(&self) -> &BackendHandle {
        self.query.backend()
    }

    /// Read the map at one position.
    ///
    /// `distance_kpc` is required for 3-D maps and ignored for 2-D ones.
    pub fn lookup(&self, l_deg: f64, b_deg: f64, distance_kpc: Option<f64>) -> Result<f64> {
        self.query.lookup(l_deg, b_deg, distance_kpc)
    }

    /// Read the map at many positions. Inputs of length 1 broadcast.
    pub fn lookup_many(
        &self,
        l_deg: ArrayView1<f64>,
        b_deg: ArrayView1<f64>,
        distance_kpc: Option<ArrayView1<f64>>,
    ) -> Result<Array1<f64>> {
        self.query.lookup_many(l_deg, b_deg, distance_kpc)
    }

    /// Set the current line of sight used by [`MapAdapter::update`].
    pub fn update_line_of_sight(&mut self, l_deg: f64, b_deg: f64) -> Result<()> {
        SkyPosition::galactic(l_deg, b_deg)?;
        self.line_of_sight = Some((l_deg, b_deg));
        Ok(())
    }

    pub fn line_of_sight(&self) -> Option<(f64, f64)> {
        self.line_of_sight
    }

    /// Refresh the extinction state for the slice at `radius_kpc`.
    ///
    /// In deferred mode the radius is not used; the stored sight line takes
    /// distances when evaluated. On error the previous state is kept.
    pub fn update(&mut self, radius_kpc: f64) -> Result<()> {
        let (l_deg, b_deg) = self
            .line_of_sight
            .ok_or_else(|| ConfigurationError::NoLineOfSight {
                identifier: self.identifier().to_string(),
            })?;

        self.state = match self.mode {
            EvaluationMode::Deferred => {
                ExtinctionState::Pending(SightLine::new(Arc::clone(&self.query), l_deg, b_deg))
            }
            EvaluationMode::Immediate => {
                ExtinctionState::Resolved(self.query.lookup(l_deg, b_deg, Some(radius_kpc))?)
            }
        };
        Ok(())
    }

    /// What the last update stored
    pub fn state(&self) -> &ExtinctionState {
        &self.state
    }

    /// Value stored by an immediate update
    pub fn resolved_value(&self) -> Option<f64> {
        self.state.value()
    }

    /// Sight line stored by a deferred update
    pub fn sight_line(&self) -> Option<&SightLine> {
        self.state.sight_line()
    }
}

impl std::fmt::Debug for MapAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapAdapter")
            .field("map", &self.name())
            .field("mode", &self.mode)
            .field("line_of_sight", &self.line_of_sight)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendKind, DustQuery, Options};
    use crate::dataset::{DatasetStore, FetchError};
    use crate::registry::MapRegistry;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    /// Value depends on every coordinate, so distance sensitivity is visible
    struct Gradient;

    impl DustQuery for Gradient {
        fn query(&self, position: &SkyPosition, _options: &Options) -> std::result::Result<f64, BackendError> {
            Ok(0.01 * position.l_deg() + 0.1 * position.b_deg() + position.distance_kpc().unwrap_or(0.0))
        }
    }

    struct Installed;

    impl DatasetStore for Installed {
        fn is_present(&self, _identifier: &str) -> bool {
            true
        }

        fn fetch(&self, _identifier: &str) -> std::result::Result<PathBuf, FetchError> {
            Err(FetchError::Disabled)
        }

        fn location(&self, identifier: &str) -> PathBuf {
            PathBuf::from("/data").join(identifier)
        }
    }

    fn context() -> MapContext {
        let factory = |_kind: &BackendKind, _options: &Options| -> std::result::Result<Arc<dyn DustQuery>, BackendError> {
            Ok(Arc::new(Gradient))
        };
        MapContext::new(MapRegistry::builtin(), factory, Installed)
    }

    #[test]
    fn test_metadata_from_entry() {
        let ctx = context();
        let map = ctx.open("marshall").unwrap();
        assert_eq!(map.name(), "dustmaps.marshall");
        assert!(map.is_3d());
        assert_eq!(map.returns(), "A_Ks");
        assert_eq!(map.reference_wavelengths(), (2.152, None));
        assert_eq!(map.mode(), EvaluationMode::Deferred);

        let sfd = ctx.open("sfd").unwrap();
        assert_eq!(sfd.dimensionality(), Dimensionality::TwoD);
        assert_eq!(sfd.reference_wavelengths(), (0.493, Some(0.551)));
    }

    #[test]
    fn test_update_requires_line_of_sight() {
        let ctx = context();
        let mut map = ctx.open_with_mode("bayestar", EvaluationMode::Immediate).unwrap();
        let err = map.update(1.0).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(map.state(), ExtinctionState::Empty));
    }

    #[test]
    fn test_immediate_update_resolves() {
        let ctx = context();
        let mut map = ctx.open_with_mode("bayestar", EvaluationMode::Immediate).unwrap();
        map.update_line_of_sight(30.0, 5.0).unwrap();
        map.update(2.0).unwrap();

        let expected = map.lookup(30.0, 5.0, Some(2.0)).unwrap();
        assert!(map.state().is_resolved());
        assert_relative_eq!(map.resolved_value().unwrap(), expected);
        assert!(map.sight_line().is_none());
    }

    #[test]
    fn test_deferred_update_stores_sight_line() {
        let ctx = context();
        let mut map = ctx.open_with_mode("bayestar", EvaluationMode::Deferred).unwrap();
        map.update_line_of_sight(30.0, 5.0).unwrap();
        map.update(2.0).unwrap();

        let sight_line = map.state().sight_line().unwrap();
        assert_eq!((sight_line.l_deg(), sight_line.b_deg()), (30.0, 5.0));
        for distance in [0.1, 2.0, 7.5] {
            assert_relative_eq!(
                sight_line.evaluate(distance).unwrap(),
                map.lookup(30.0, 5.0, Some(distance)).unwrap()
            );
        }
        assert!(map.state().value().is_none());
    }

    #[test]
    fn test_failed_immediate_update_keeps_state() {
        let ctx = context();
        let mut map = ctx.open_with_mode("chen2014", EvaluationMode::Immediate).unwrap();
        map.update_line_of_sight(10.0, 0.0).unwrap();
        map.update(1.0).unwrap();

        assert!(map.update(-3.0).is_err());
        assert_relative_eq!(map.state().value().unwrap(), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_line_of_sight_rejected() {
        let ctx = context();
        let mut map = ctx.open("sfd").unwrap();
        assert!(map.update_line_of_sight(10.0, 120.0).is_err());
        assert!(map.line_of_sight().is_none());
    }
}
