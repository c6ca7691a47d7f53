use std::sync::Arc;

use crate::data::point::squared_distance;
use crate::error::{Error, Result};

/// An immutable set of `k` centroid vectors with stable ids `0..k`.
///
/// A centroid's id persists across iterations even as its vector moves;
/// the set itself is replaced wholesale each round, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidSet {
    vectors: Vec<Vec<f64>>,
    dim: usize,
}

impl CentroidSet {
    /// Build a centroid set from explicit vectors, for warm-starting a run
    /// via [`KMeans::fit_with`](crate::KMeans::fit_with).
    pub fn new(vectors: Vec<Vec<f64>>) -> Result<Self> {
        if vectors.is_empty() {
            return Err(Error::InvalidConfig("centroid set must not be empty".into()));
        }
        let dim = vectors[0].len();
        if dim == 0 {
            return Err(Error::InvalidPoint("centroid has no dimensions"));
        }
        for v in &vectors {
            if v.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: v.len(),
                });
            }
            if v.iter().any(|c| !c.is_finite()) {
                return Err(Error::InvalidPoint("centroid coordinate is not finite"));
            }
        }
        Ok(Self { vectors, dim })
    }

    pub(crate) fn from_vectors(vectors: Vec<Vec<f64>>) -> Self {
        debug_assert!(!vectors.is_empty());
        let dim = vectors[0].len();
        debug_assert!(vectors.iter().all(|v| v.len() == dim));
        Self { vectors, dim }
    }

    /// Number of centroids.
    pub fn k(&self) -> usize {
        self.vectors.len()
    }

    /// Dimension of every centroid vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The vector for a centroid id.
    pub fn vector(&self, id: usize) -> &[f64] {
        &self.vectors[id]
    }

    /// Centroid vectors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.vectors.iter().map(Vec::as_slice)
    }

    /// Nearest centroid to `point`: `(id, squared distance)`.
    /// Ties go to the lowest id.
    pub fn nearest(&self, point: &[f64]) -> (usize, f64) {
        let mut best_id = 0;
        let mut best = squared_distance(point, &self.vectors[0]);
        for (id, v) in self.vectors.iter().enumerate().skip(1) {
            let d = squared_distance(point, v);
            if d < best {
                best = d;
                best_id = id;
            }
        }
        (best_id, best)
    }
}

/// A centroid set as seen by workers during one iteration.
pub type CentroidSnapshot = Arc<CentroidSet>;

/// Publish an immutable snapshot of the centroid set for one iteration.
///
/// Every assignment mapper in the iteration reads this same snapshot; the
/// driver builds the next set separately, so no worker can observe a
/// partially updated centroid.
pub fn broadcast(centroids: &CentroidSet) -> CentroidSnapshot {
    Arc::new(centroids.clone())
}
