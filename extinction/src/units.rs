//! Typed units for wavelengths, sky angles and line-of-sight distances
//!
//! Wraps the `uom` crate with small extension traits so the rest of the crate
//! can speak in the units astronomers use (micrometers, degrees, kiloparsecs)
//! without passing bare floats across module boundaries.

use uom::si::angle::{degree, radian};
use uom::si::length::{micrometer, nanometer, parsec};

/// Type alias for sky angles
pub type Angle = uom::si::f64::Angle;

/// Type alias for wavelengths and distances
pub type Length = uom::si::f64::Length;

const PARSECS_PER_KILOPARSEC: f64 = 1000.0;

/// Extension trait for angle conversions
pub trait AngleExt {
    /// Create an angle from degrees
    fn from_degrees(deg: f64) -> Self;

    /// Get the angle in degrees
    fn as_degrees(&self) -> f64;

    /// Get the angle in radians
    fn as_radians(&self) -> f64;
}

/// Extension trait for the length scales used here
pub trait LengthExt {
    /// Create a wavelength from micrometers
    fn from_micrometers(um: f64) -> Self;

    /// Get length in micrometers
    fn as_micrometers(&self) -> f64;

    /// Get length in nanometers
    fn as_nanometers(&self) -> f64;

    /// Create a distance from kiloparsecs
    fn from_kiloparsecs(kpc: f64) -> Self;

    /// Get length in kiloparsecs
    fn as_kiloparsecs(&self) -> f64;

    /// Inverse wavelength in µm⁻¹, the variable extinction laws are fitted in
    fn wavenumber_per_micrometer(&self) -> f64 {
        1.0 / self.as_micrometers()
    }
}

impl AngleExt for Angle {
    fn from_degrees(deg: f64) -> Self {
        Angle::new::<degree>(deg)
    }

    fn as_degrees(&self) -> f64 {
        self.get::<degree>()
    }

    fn as_radians(&self) -> f64 {
        self.get::<radian>()
    }
}

impl LengthExt for Length {
    fn from_micrometers(um: f64) -> Self {
        Length::new::<micrometer>(um)
    }

    fn as_micrometers(&self) -> f64 {
        self.get::<micrometer>()
    }

    fn as_nanometers(&self) -> f64 {
        self.get::<nanometer>()
    }

    fn from_kiloparsecs(kpc: f64) -> Self {
        Length::new::<parsec>(kpc * PARSECS_PER_KILOPARSEC)
    }

    fn as_kiloparsecs(&self) -> f64 {
        self.get::<parsec>() / PARSECS_PER_KILOPARSEC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wavelength_conversions() {
        let v_band = Length::from_micrometers(0.551);
        assert_relative_eq!(v_band.as_micrometers(), 0.551, epsilon = 1e-12);
        assert_relative_eq!(v_band.as_nanometers(), 551.0, epsilon = 1e-9);
        assert_relative_eq!(v_band.wavenumber_per_micrometer(), 1.0 / 0.551, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_conversions() {
        let d = Length::from_kiloparsecs(8.2);
        assert_relative_eq!(d.as_kiloparsecs(), 8.2, epsilon = 1e-9);

        // Comparisons work on the underlying quantity
        assert!(Length::from_kiloparsecs(0.5) < Length::from_kiloparsecs(2.0));
    }

    #[test]
    fn test_angle_conversions() {
        let a = Angle::from_degrees(180.0);
        assert_relative_eq!(a.as_degrees(), 180.0, epsilon = 1e-12);
        assert_relative_eq!(a.as_radians(), std::f64::consts::PI, epsilon = 1e-12);
    }
}
