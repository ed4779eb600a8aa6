//! Wang & Chen (2019), ApJ 877, 116
//!
//! Optical to mid-infrared law derived from APOGEE, Gaia DR2, Pan-STARRS1,
//! SDSS, APASS, 2MASS and WISE photometry of red clump stars.

use super::{inverse_wavelength, polynomial, ExtinctionLaw};

/// Inverse wavelength (µm⁻¹) separating the power-law and polynomial regimes
const REGIME_BREAK: f64 = 1.0;

/// Pivot of the optical polynomial, y = x - PIVOT
const PIVOT: f64 = 1.82;

const OPTICAL: [f64; 8] = [
    1.0, 0.7499, -0.1086, -0.08909, 0.02905, 0.01069, 0.001707, -0.001002,
];

const IR_SCALE: f64 = 0.3722;
const IR_INDEX: f64 = 2.07;

/// Wang & Chen (2019) extinction law. Independent of R_V.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WangChen2019;

impl ExtinctionLaw for WangChen2019 {
    fn name(&self) -> &'static str {
        "WangChen2019"
    }

    fn a_lambda_over_a_v(&self, wavelength_um: f64, _r_v: f64) -> f64 {
        let x = inverse_wavelength(wavelength_um);
        if x >= REGIME_BREAK {
            polynomial(&OPTICAL, x - PIVOT)
        } else {
            IR_SCALE * x.powf(IR_INDEX)
        }
    }
}
