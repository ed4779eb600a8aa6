//! Position building and backend invocation shared by adapters and sight lines

use ndarray::{Array1, ArrayView1};

use crate::backend::{BackendHandle, Options};
use crate::error::{ConfigurationError, Result};
use crate::registry::Dimensionality;
use crate::sky::SkyPosition;

/// One map's backend bound to the metadata needed to query it.
pub(crate) struct MapQuery {
    identifier: String,
    dimensionality: Dimensionality,
    backend: BackendHandle,
    query_options: Options,
}

impl MapQuery {
    pub(crate) fn new(
        identifier: &str,
        dimensionality: Dimensionality,
        backend: BackendHandle,
        query_options: Options,
    ) -> Self {
        Self {
            identifier: identifier.to_string(),
            dimensionality,
            backend,
            query_options,
        }
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    /// Build the position a backend expects. Distance is attached only for
    /// 3-D maps and is never even inspected for 2-D ones.
    pub(crate) fn position(&self, l_deg: f64, b_deg: f64, distance_kpc: Option<f64>) -> Result<SkyPosition> {
        let position = SkyPosition::galactic(l_deg, b_deg)?;
        match self.dimensionality {
            Dimensionality::TwoD => Ok(position),
            Dimensionality::ThreeD => {
                let distance = distance_kpc.ok_or_else(|| ConfigurationError::MissingDistance {
                    identifier: self.identifier.clone(),
                })?;
                Ok(position.with_distance(distance)?)
            }
        }
    }

    pub(crate) fn lookup(&self, l_deg: f64, b_deg: f64, distance_kpc: Option<f64>) -> Result<f64> {
        let position = self.position(l_deg, b_deg, distance_kpc)?;
        Ok(self.backend.query(&position, &self.query_options)?)
    }

    /// Vectorized lookup; length-1 inputs broadcast against the others.
    pub(crate) fn lookup_many(
        &self,
        l_deg: ArrayView1<f64>,
        b_deg: ArrayView1<f64>,
        distance_kpc: Option<ArrayView1<f64>>,
    ) -> Result<Array1<f64>> {
        let distance = match self.dimensionality {
            Dimensionality::TwoD => None,
            Dimensionality::ThreeD => Some(distance_kpc.ok_or_else(|| {
                ConfigurationError::MissingDistance {
                    identifier: self.identifier.clone(),
                }
            })?),
        };

        let mut lengths = vec![l_deg.len(), b_deg.len()];
        if let Some(d) = &distance {
            lengths.push(d.len());
        }
        let n = broadcast_len(&lengths)?;

        let at = |values: &ArrayView1<f64>, i: usize| {
            if values.len() == 1 {
                values[0]
            } else {
                values[i]
            }
        };

        let positions = (0..n)
            .map(|i| {
                self.position(
                    at(&l_deg, i),
                    at(&b_deg, i),
                    distance.as_ref().map(|d| at(d, i)),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.backend.query_many(&positions, &self.query_options)?)
    }
}

/// Common length of the inputs that are not length 1, or 1 when all are.
/// Zero is a valid common length.
fn broadcast_len(lengths: &[usize]) -> std::result::Result<usize, ConfigurationError> {
    let mut common = None;
    for &len in lengths.iter().filter(|&&len| len != 1) {
        match common {
            None => common = Some(len),
            Some(n) if n == len => {}
            Some(_) => {
                return Err(ConfigurationError::ShapeMismatch {
                    lengths: lengths.to_vec(),
                })
            }
        }
    }
    Ok(common.unwrap_or(1))
}
