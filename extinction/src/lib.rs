//! Interstellar extinction for synthetic stellar populations
//!
//! This crate provides two things a galaxy-simulation pipeline needs to dim
//! and redden its synthetic stars:
//!
//! * [`law`] - published extinction laws giving A_λ/A_V at any filter
//!   wavelength, plus conversion of a dust map's native quantity into the
//!   extinction in a band
//! * [`map`] - a uniform adapter over many dust-survey maps, with one shared
//!   backend per survey and deferred or immediate evaluation along a line of
//!   sight
//!
//! Survey backends are supplied by the embedding application through
//! [`backend::BackendFactory`]; this crate decides which backend a map needs,
//! keeps exactly one of each alive, and checks that its data is installed.

pub mod backend;
pub mod config;
pub mod dataset;
pub mod error;
pub mod law;
pub mod map;
pub mod registry;
pub mod sky;
pub mod units;

// Re-exports for easier access
pub use backend::{BackendCache, BackendError, BackendFactory, BackendKind, DustQuery, Options};
pub use config::ExtinctionConfig;
pub use dataset::{DatasetStore, FetchError, LocalDataStore};
pub use error::{ConfigurationError, ExtinctionError, Result};
pub use law::{ExtinctionLaw, Law, DEFAULT_R_V};
pub use map::{EvaluationMode, ExtinctionState, MapAdapter, MapContext, SightLine};
pub use registry::{Dimensionality, MapQuantity, MapRegistry, MapRegistryEntry, QuantityKind};
pub use sky::SkyPosition;
