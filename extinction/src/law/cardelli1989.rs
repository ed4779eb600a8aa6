//! Cardelli, Clayton & Mathis (1989), ApJ 345, 245
//!
//! A_λ/A_V = a(x) + b(x)/R_V with separate infrared, optical/near-infrared and
//! ultraviolet fits. Outside 0.3 ≤ x ≤ 8 µm⁻¹ the nearest regime is
//! extrapolated.

use super::{inverse_wavelength, polynomial, ExtinctionLaw};

pub(crate) const IR_BREAK: f64 = 1.1;
pub(crate) const UV_BREAK: f64 = 3.3;
pub(crate) const PIVOT: f64 = 1.82;

const FAR_UV_BREAK: f64 = 5.9;
const IR_INDEX: f64 = 1.61;

const OPTICAL_A: [f64; 8] = [
    1.0, 0.17699, -0.50447, -0.02427, 0.72085, 0.01979, -0.77530, 0.32999,
];
const OPTICAL_B: [f64; 8] = [
    0.0, 1.41338, 2.28305, 1.07233, -5.38434, -0.62251, 5.30260, -2.09002,
];

/// Infrared a(x), b(x) shared with laws that only revise the optical fit
pub(crate) fn infrared(x: f64) -> (f64, f64) {
    let scale = x.powf(IR_INDEX);
    (0.574 * scale, -0.527 * scale)
}

/// Ultraviolet a(x), b(x) including the far-UV curvature term
pub(crate) fn ultraviolet(x: f64) -> (f64, f64) {
    let (fa, fb) = if x >= FAR_UV_BREAK {
        let y = x - FAR_UV_BREAK;
        (
            -0.04473 * y.powi(2) - 0.009779 * y.powi(3),
            0.2130 * y.powi(2) + 0.1207 * y.powi(3),
        )
    } else {
        (0.0, 0.0)
    };

    let a = 1.752 - 0.316 * x - 0.104 / ((x - 4.67).powi(2) + 0.341) + fa;
    let b = -3.090 + 1.825 * x + 1.206 / ((x - 4.62).powi(2) + 0.263) + fb;
    (a, b)
}

/// Cardelli, Clayton & Mathis (1989) extinction law
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cardelli1989;

impl ExtinctionLaw for Cardelli1989 {
    fn name(&self) -> &'static str {
        "Cardelli1989"
    }

    fn a_lambda_over_a_v(&self, wavelength_um: f64, r_v: f64) -> f64 {
        let x = inverse_wavelength(wavelength_um);
        let (a, b) = if x < IR_BREAK {
            infrared(x)
        } else if x < UV_BREAK {
            let y = x - PIVOT;
            (polynomial(&OPTICAL_A, y), polynomial(&OPTICAL_B, y))
        } else {
            ultraviolet(x)
        };
        a + b / r_v
    }
}
