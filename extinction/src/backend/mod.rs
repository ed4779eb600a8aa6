//! Dust-survey backends
//!
//! A backend answers "how much dust along this line of sight" for one survey.
//! The surveys themselves (their file formats, sampling and inference) live
//! outside this crate; here they are reached through three pieces:
//!
//! * [`BackendKind`] - the closed set of supported surveys, used by the
//!   registry to name which backend an identifier needs
//! * [`DustQuery`] - the single query capability every backend implements
//! * [`BackendFactory`] - builds a backend for a [`BackendKind`] from its
//!   construction options
//!
//! Constructed backends are shared through the [`BackendCache`].

pub mod cache;
mod options;

use std::fmt;
use std::sync::Arc;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::{BackendCache, BackendHandle, CacheStats};
pub use options::{OptionValue, Options};

use crate::sky::SkyPosition;

/// Errors raised by backends while being built or queried.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The factory could not build a backend.
    #[error("failed to construct {backend} backend: {reason}")]
    Construction { backend: String, reason: String },

    /// The factory has no constructor for this kind.
    #[error("no constructor registered for {0} backend")]
    NoConstructor(String),

    /// Position lies outside the survey footprint.
    #[error("position (l = {l_deg}°, b = {b_deg}°) is outside the survey footprint")]
    OutOfCoverage { l_deg: f64, b_deg: f64 },

    /// Any other query failure.
    #[error("query failed: {0}")]
    Query(String),

    #[error("I/O error reading survey data: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported dust surveys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Bayestar,
    Bh,
    Chen2014,
    Csfd,
    GaiaTge,
    Iphas,
    LeikeEnsslin2019,
    Leike2020,
    Edenhofer2023,
    Lenz2017,
    Marshall,
    Pg2010,
    PlanckGnilc,
    Planck,
    Sfd,
    /// A survey supplied by the embedding application
    Custom(String),
}

impl BackendKind {
    /// Name of the query type, used in logs and error messages
    pub fn query_name(&self) -> &str {
        match self {
            BackendKind::Bayestar => "BayestarQuery",
            BackendKind::Bh => "BHQuery",
            BackendKind::Chen2014 => "Chen2014Query",
            BackendKind::Csfd => "CSFDQuery",
            BackendKind::GaiaTge => "GaiaTGEQuery",
            BackendKind::Iphas => "IPHASQuery",
            BackendKind::LeikeEnsslin2019 => "LeikeEnsslin2019Query",
            BackendKind::Leike2020 => "Leike2020Query",
            BackendKind::Edenhofer2023 => "Edenhofer2023Query",
            BackendKind::Lenz2017 => "Lenz2017Query",
            BackendKind::Marshall => "MarshallQuery",
            BackendKind::Pg2010 => "PG2010Query",
            BackendKind::PlanckGnilc => "PlanckGNILCQuery",
            BackendKind::Planck => "PlanckQuery",
            BackendKind::Sfd => "SFDQuery",
            BackendKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_name())
    }
}

/// Query capability shared by every survey backend.
///
/// `position` carries a distance exactly when the map is three-dimensional.
/// `options` are the per-call keyword options from the registry entry.
pub trait DustQuery: Send + Sync {
    /// Native quantity (extinction, color excess or e-foldings) at one position
    fn query(&self, position: &SkyPosition, options: &Options) -> Result<f64, BackendError>;

    /// Vectorized query. Backends with a faster bulk path should override it.
    fn query_many(
        &self,
        positions: &[SkyPosition],
        options: &Options,
    ) -> Result<Array1<f64>, BackendError> {
        positions
            .iter()
            .map(|position| self.query(position, options))
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from_vec)
    }
}

/// Builds backends from their registry description.
pub trait BackendFactory: Send + Sync {
    fn construct(
        &self,
        kind: &BackendKind,
        options: &Options,
    ) -> Result<Arc<dyn DustQuery>, BackendError>;
}

impl<F> BackendFactory for F
where
    F: Fn(&BackendKind, &Options) -> Result<Arc<dyn DustQuery>, BackendError> + Send + Sync,
{
    fn construct(
        &self,
        kind: &BackendKind,
        options: &Options,
    ) -> Result<Arc<dyn DustQuery>, BackendError> {
        self(kind, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Latitude;

    impl DustQuery for Latitude {
        fn query(&self, position: &SkyPosition, _options: &Options) -> Result<f64, BackendError> {
            if position.b_deg() < 0.0 {
                return Err(BackendError::OutOfCoverage {
                    l_deg: position.l_deg(),
                    b_deg: position.b_deg(),
                });
            }
            Ok(position.b_deg())
        }
    }

    #[test]
    fn test_query_many_default() {
        let positions: Vec<_> = [1.0, 2.0, 3.0]
            .iter()
            .map(|b| SkyPosition::galactic(0.0, *b).unwrap())
            .collect();
        let values = Latitude.query_many(&positions, &Options::new()).unwrap();
        assert_eq!(values, Array1::from_vec(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_query_many_stops_on_error() {
        let positions = vec![
            SkyPosition::galactic(0.0, 1.0).unwrap(),
            SkyPosition::galactic(0.0, -1.0).unwrap(),
        ];
        let err = Latitude.query_many(&positions, &Options::new()).unwrap_err();
        assert!(matches!(err, BackendError::OutOfCoverage { .. }));
    }

    #[test]
    fn test_closure_factory() {
        let factory = |kind: &BackendKind, _options: &Options| -> Result<Arc<dyn DustQuery>, BackendError> {
            match kind {
                BackendKind::Sfd => Ok(Arc::new(Latitude)),
                other => Err(BackendError::NoConstructor(other.to_string())),
            }
        };

        assert!(factory.construct(&BackendKind::Sfd, &Options::new()).is_ok());
        let err = factory
            .construct(&BackendKind::Marshall, &Options::new())
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "no constructor registered for MarshallQuery backend");
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&BackendKind::PlanckGnilc).unwrap();
        assert_eq!(json, "\"planck_gnilc\"");
        let custom: BackendKind = serde_json::from_str(r#"{"custom":"MyQuery"}"#).unwrap();
        assert_eq!(custom, BackendKind::Custom("MyQuery".to_string()));
        assert_eq!(custom.to_string(), "MyQuery");
    }
}
