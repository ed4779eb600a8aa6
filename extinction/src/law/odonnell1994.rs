//! O'Donnell (1994), ApJ 422, 158
//!
//! Revises the optical/near-infrared polynomials of Cardelli, Clayton &
//! Mathis (1989); infrared and ultraviolet regimes are unchanged.

use super::cardelli1989::{infrared, ultraviolet, IR_BREAK, PIVOT, UV_BREAK};
use super::{inverse_wavelength, polynomial, ExtinctionLaw};

const OPTICAL_A: [f64; 9] = [
    1.0, 0.104, -0.609, 0.701, 1.137, -1.718, -0.827, 1.647, -0.505,
];
const OPTICAL_B: [f64; 9] = [
    0.0, 1.952, 2.908, -3.989, -7.985, 11.102, 5.491, -10.805, 3.347,
];

/// O'Donnell (1994) extinction law
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ODonnell1994;

impl ExtinctionLaw for ODonnell1994 {
    fn name(&self) -> &'static str {
        "ODonnell1994"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law::Cardelli1989;
    use approx::assert_relative_eq;

    #[test]
    fn test_shares_cardelli_outside_optical() {
        for wavelength in [0.15, 0.25, 1.25, 2.2, 3.0] {
            assert_relative_eq!(
                ODonnell1994.a_lambda_over_a_v(wavelength, 3.1),
                Cardelli1989.a_lambda_over_a_v(wavelength, 3.1),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_optical_revision_differs() {
        let revised = ODonnell1994.a_lambda_over_a_v(0.44, 3.1);
        let original = Cardelli1989.a_lambda_over_a_v(0.44, 3.1);
        assert!((revised - original).abs() > 1e-4);
    }
}
