//! Galactic sky positions handed to dust-map backends

use crate::error::ConfigurationError;
use crate::units::{Angle, AngleExt, Length, LengthExt};

/// A point on the sky in galactic coordinates, optionally with a distance.
///
/// Longitude is normalized into [0°, 360°). Latitude must lie in [-90°, 90°].
/// Coordinates are kept exactly as given so backends see the caller's values;
/// the typed accessors convert on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    l_deg: f64,
    b_deg: f64,
    distance_kpc: Option<f64>,
}

impl SkyPosition {
    /// Build a position without distance.
    ///
    /// # Arguments
    /// * `l_deg` - Galactic longitude in degrees (any finite value, wrapped)
    /// * `b_deg` - Galactic latitude in degrees
    pub fn galactic(l_deg: f64, b_deg: f64) -> Result<Self, ConfigurationError> {
        if !l_deg.is_finite() || !b_deg.is_finite() || !(-90.0..=90.0).contains(&b_deg) {
            return Err(ConfigurationError::InvalidPosition { l_deg, b_deg });
        }

        Ok(Self {
            l_deg: l_deg.rem_euclid(360.0),
            b_deg,
            distance_kpc: None,
        })
    }

    /// Attach a line-of-sight distance in kiloparsecs.
    pub fn with_distance(mut self, distance_kpc: f64) -> Result<Self, ConfigurationError> {
        if !distance_kpc.is_finite() || distance_kpc < 0.0 {
            return Err(ConfigurationError::InvalidDistance { distance_kpc });
        }
        self.distance_kpc = Some(distance_kpc);
        Ok(self)
    }

    /// Galactic longitude in degrees, in [0, 360)
    pub fn l_deg(&self) -> f64 {
        self.l_deg
    }

    /// Galactic latitude in degrees
    pub fn b_deg(&self) -> f64 {
        self.b_deg
    }

    /// Distance in kiloparsecs, if one was attached
    pub fn distance_kpc(&self) -> Option<f64> {
        self.distance_kpc
    }

    pub fn longitude(&self) -> Angle {
        Angle::from_degrees(self.l_deg)
    }

    pub fn latitude(&self) -> Angle {
        Angle::from_degrees(self.b_deg)
    }

    pub fn distance(&self) -> Option<Length> {
        self.distance_kpc.map(Length::from_kiloparsecs)
    }
}
