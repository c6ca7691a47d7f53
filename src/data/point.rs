use crate::error::{Error, Result};

/// A fixed-dimension data point with finite coordinates.
///
/// Validation happens once at construction; after that the point is
/// immutable, so distance computations never re-check for NaN or infinity.
///
/// # Examples
///
/// ```
/// use parlloyd::Point;
///
/// let p = Point::new(vec![1.0, 2.0]).unwrap();
/// assert_eq!(p.dim(), 2);
/// assert!(Point::new(vec![f64::NAN]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coords: Vec<f64>,
}

impl Point {
    /// Build a point from raw coordinates.
    ///
    /// Rejects empty vectors and non-finite coordinates so numeric
    /// surprises are caught at ingestion, not inside an iteration.
    pub fn new(coords: Vec<f64>) -> Result<Self> {
        if coords.is_empty() {
            return Err(Error::InvalidPoint(
                "point must have at least one dimension",
            ));
        }
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidPoint("non-finite coordinate"));
        }
        Ok(Self { coords })
    }

    /// Number of coordinates.
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Coordinates as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }
}

impl AsRef<[f64]> for Point {
    fn as_ref(&self) -> &[f64] {
        &self.coords
    }
}

/// Squared Euclidean distance between two vectors of the same dimension.
/// The squared form avoids the sqrt during nearest-centroid comparisons.
#[inline]
pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).fold(0.0, |acc, (&x, &y)| {
        let d = x - y;
        acc + d * d
    })
}
