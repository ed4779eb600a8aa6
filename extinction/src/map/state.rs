//! Evaluation modes and the per-adapter extinction state

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::lookup::MapQuery;
use crate::error::Result;

/// How `update` fills the adapter's extinction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Store a sight line that callers evaluate at many distances later
    #[default]
    Deferred,
    /// Evaluate at the update radius right away and store the number
    Immediate,
}

/// A lookup bound to one line of sight, with the distance left open.
#[derive(Clone)]
pub struct SightLine {
    query: Arc<MapQuery>,
    l_deg: f64,
    b_deg: f64,
}

impl SightLine {
    pub(crate) fn new(query: Arc<MapQuery>, l_deg: f64, b_deg: f64) -> Self {
        Self { query, l_deg, b_deg }
    }

    pub fn l_deg(&self) -> f64 {
        self.l_deg
    }

    pub fn b_deg(&self) -> f64 {
        self.b_deg
    }

    /// Map value at `distance_kpc` along this sight line
    pub fn evaluate(&self, distance_kpc: f64) -> Result<f64> {
        self.query.lookup(self.l_deg, self.b_deg, Some(distance_kpc))
    }

    /// Map values at several distances along this sight line
    pub fn evaluate_many(&self, distances_kpc: ArrayView1<f64>) -> Result<Array1<f64>> {
        let l = [self.l_deg];
        let b = [self.b_deg];
        self.query.lookup_many(
            ArrayView1::from(&l[..]),
            ArrayView1::from(&b[..]),
            Some(distances_kpc),
        )
    }
}

impl fmt::Debug for SightLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SightLine")
            .field("map", &self.query.identifier())
            .field("l_deg", &self.l_deg)
            .field("b_deg", &self.b_deg)
            .finish()
    }
}

/// What the last `update` stored.
#[derive(Debug, Clone, Default)]
pub enum ExtinctionState {
    /// `update` has not run yet
    #[default]
    Empty,
    /// Deferred mode: a sight line awaiting distances
    Pending(SightLine),
    /// Immediate mode: the value at the update radius
    Resolved(f64),
}

impl ExtinctionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ExtinctionState::Pending(_))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ExtinctionState::Resolved(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ExtinctionState::Resolved(value) => Some(*value),
            _ => None,
        }
    }

    pub fn sight_line(&self) -> Option<&SightLine> {
        match self {
            ExtinctionState::Pending(sight_line) => Some(sight_line),
            _ => None,
        }
    }
}
