//! Error types for extinction laws, map resolution and backend access.

use thiserror::Error;

use crate::backend::BackendError;
use crate::dataset::FetchError;

/// Documentation reference handed out whenever survey data cannot be found.
pub const DATA_DOCS_URL: &str = "https://dustmaps.readthedocs.io/en/latest/installation.html";

/// Caller-side mistakes: unknown names, missing arguments, malformed tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Identifier is not in the map registry.
    #[error(
        "'{identifier}' is not a known extinction map; \
         register an entry for it before requesting it"
    )]
    UnknownMap { identifier: String },

    /// A 3-D map was queried without a line-of-sight distance.
    #[error("map '{identifier}' is three-dimensional and needs a distance for every lookup")]
    MissingDistance { identifier: String },

    /// `update` was called before any sight line was set.
    #[error("map '{identifier}' has no current line of sight; call update_line_of_sight first")]
    NoLineOfSight { identifier: String },

    /// Sky position outside the valid galactic range.
    #[error("invalid galactic position: l = {l_deg}°, b = {b_deg}°")]
    InvalidPosition { l_deg: f64, b_deg: f64 },

    /// Distance was negative or not finite.
    #[error("invalid distance: {distance_kpc} kpc")]
    InvalidDistance { distance_kpc: f64 },

    /// Vectorized inputs cannot be broadcast against each other.
    #[error("cannot broadcast inputs of lengths {lengths:?}")]
    ShapeMismatch { lengths: Vec<usize> },

    /// Extinction law name is not recognized.
    #[error("unknown extinction law '{name}'")]
    UnknownLaw { name: String },

    /// A registry entry violates the table's consistency rules.
    #[error("invalid registry entry '{identifier}': {reason}")]
    InvalidRegistryEntry { identifier: String, reason: String },
}

/// Top-level error for the crate.
#[derive(Error, Debug)]
pub enum ExtinctionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Map is known but deliberately disabled.
    #[error("extinction map '{identifier}' is not implemented yet")]
    UnsupportedFeature { identifier: String },

    /// Dataset is missing locally and could not be fetched.
    #[error(
        "data for the '{identifier}' dust map is not available\n\
         {instructions}\n\
         please see '{docs_url}' for further details"
    )]
    DataUnavailable {
        identifier: String,
        instructions: String,
        docs_url: &'static str,
        #[source]
        source: FetchError,
    },

    /// Failure raised by a survey backend, passed through untouched.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Settings file could not be read or parsed.
    #[error("configuration file error: {0}")]
    Config(#[from] std::io::Error),

    /// JSON text (e.g. a custom registry table) is malformed.
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ExtinctionError {
    /// True for the configuration class of failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExtinctionError::Configuration(_))
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, ExtinctionError>;
