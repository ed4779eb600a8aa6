//! Wavelength-dependent extinction laws
//!
//! An extinction law maps an effective filter wavelength to the ratio
//! A_λ/A_V. Laws are fitted piecewise in the inverse wavelength x = 1/λ
//! (µm⁻¹); each concrete law keeps its published coefficients and regime
//! breakpoints exactly, including any discontinuity between regimes.
//!
//! The [`ExtinctionLaw`] trait also carries the bookkeeping needed to turn a
//! dust map's native quantity (an extinction at some reference wavelength, a
//! color excess, or a count of e-foldings) into the extinction in an
//! arbitrary band.

mod cardelli1989;
mod odonnell1994;
mod wang_chen2019;

use std::fmt;
use std::str::FromStr;

pub use cardelli1989::Cardelli1989;
pub use odonnell1994::ODonnell1994;
pub use wang_chen2019::WangChen2019;

use crate::error::ConfigurationError;
use crate::registry::MapQuantity;

/// Default total-to-selective extinction ratio for the diffuse ISM
pub const DEFAULT_R_V: f64 = 3.1;

/// Magnitudes of extinction per e-folding of optical depth, 2.5·log10(e)
pub const MAGNITUDES_PER_E_FOLDING: f64 = 1.085_736_204_758_129_6;

/// Convert an effective wavelength in micrometers into x = 1/λ.
///
/// Non-positive or non-finite wavelengths are programming errors and panic.
pub(crate) fn inverse_wavelength(wavelength_um: f64) -> f64 {
    if !wavelength_um.is_finite() || wavelength_um <= 0.0 {
        panic!(
            "Effective wavelength must be positive and finite, got {} µm",
            wavelength_um
        );
    }
    1.0 / wavelength_um
}

/// Evaluate a polynomial with coefficients in ascending order (Horner form).
pub(crate) fn polynomial(coefficients: &[f64], y: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * y + c)
}

/// A published extinction law.
pub trait ExtinctionLaw {
    /// Short identifier of the law
    fn name(&self) -> &'static str;

    /// Extinction at `wavelength_um` relative to the V band extinction.
    ///
    /// # Arguments
    /// * `wavelength_um` - Effective wavelength of the filter in micrometers (> 0)
    /// * `r_v` - Reddening parameter R_V; laws that do not depend on it ignore it
    fn a_lambda_over_a_v(&self, wavelength_um: f64, r_v: f64) -> f64;

    /// Extinction at `wavelength_um` relative to the extinction at `reference_um`.
    fn relative_to(&self, wavelength_um: f64, reference_um: f64, r_v: f64) -> f64 {
        self.a_lambda_over_a_v(wavelength_um, r_v) / self.a_lambda_over_a_v(reference_um, r_v)
    }

    /// Convert a dust map's native value into the extinction A_λ (magnitudes)
    /// at `wavelength_um`.
    fn band_extinction(&self, quantity: &MapQuantity, value: f64, wavelength_um: f64, r_v: f64) -> f64 {
        let target = self.a_lambda_over_a_v(wavelength_um, r_v);
        match *quantity {
            MapQuantity::Extinction { lambda_um } => {
                value * target / self.a_lambda_over_a_v(lambda_um, r_v)
            }
            MapQuantity::ColorExcess {
                lambda_um,
                lambda2_um,
            } => {
                let selective = self.a_lambda_over_a_v(lambda_um, r_v)
                    - self.a_lambda_over_a_v(lambda2_um, r_v);
                value * target / selective
            }
            MapQuantity::EFoldings { lambda_um } => {
                MAGNITUDES_PER_E_FOLDING * value * target / self.a_lambda_over_a_v(lambda_um, r_v)
            }
        }
    }
}

/// The set of laws selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Law {
    WangChen2019,
    Cardelli1989,
    ODonnell1994,
}

impl Law {
    /// Every selectable law
    pub const ALL: [Law; 3] = [Law::WangChen2019, Law::Cardelli1989, Law::ODonnell1994];

    /// Look a law up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        Self::ALL
            .into_iter()
            .find(|law| law.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ConfigurationError::UnknownLaw {
                name: name.to_string(),
            })
    }

    /// A_λ/A_V, with R_V defaulting to [`DEFAULT_R_V`] when `None`.
    pub fn evaluate(&self, wavelength_um: f64, r_v: Option<f64>) -> f64 {
        self.a_lambda_over_a_v(wavelength_um, r_v.unwrap_or(DEFAULT_R_V))
    }
}

impl ExtinctionLaw for Law {
    fn name(&self) -> &'static str {
        match self {
            Law::WangChen2019 => WangChen2019.name(),
            Law::Cardelli1989 => Cardelli1989.name(),
            Law::ODonnell1994 => ODonnell1994.name(),
        }
    }

    fn a_lambda_over_a_v(&self, wavelength_um: f64, r_v: f64) -> f64 {
        match self {
            Law::WangChen2019 => WangChen2019.a_lambda_over_a_v(wavelength_um, r_v),
            Law::Cardelli1989 => Cardelli1989.a_lambda_over_a_v(wavelength_um, r_v),
            Law::ODonnell1994 => ODonnell1994.a_lambda_over_a_v(wavelength_um, r_v),
        }
    }
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Law {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Law::from_name(s)
    }
}
