use crate::data::point::Point;
use crate::error::{Error, Result};

/// An immutable collection of points split into a fixed number of
/// partitions.
///
/// The store is created once and read-only for the lifetime of a run;
/// workers operate on disjoint partition slices and never mutate it.
/// Partitioning is contiguous: partition boundaries change with the
/// partition count, but the global scan order of points does not, which is
/// what makes results independent of how the data is split.
///
/// Empty partitions are legal (when there are fewer points than
/// partitions) and simply contribute nothing to an iteration.
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Vec<Point>,
    dim: usize,
    offsets: Vec<usize>,
}

impl PointStore {
    /// Build a store from validated points, chunked into `partition_count`
    /// contiguous partitions of near-equal size.
    pub fn new(points: Vec<Point>, partition_count: usize) -> Result<Self> {
        if partition_count == 0 {
            return Err(Error::InvalidConfig(
                "partition_count must be at least 1".into(),
            ));
        }
        if points.is_empty() {
            return Err(Error::InvalidConfig("dataset is empty".into()));
        }
        let dim = points[0].dim();
        for p in &points {
            if p.dim() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: p.dim(),
                });
            }
        }

        // offsets[i]..offsets[i + 1] is partition i; the first `n % pc`
        // partitions absorb the remainder.
        let n = points.len();
        let base = n / partition_count;
        let rem = n % partition_count;
        let mut offsets = Vec::with_capacity(partition_count + 1);
        let mut start = 0;
        offsets.push(0);
        for i in 0..partition_count {
            start += base + usize::from(i < rem);
            offsets.push(start);
        }

        Ok(Self {
            points,
            dim,
            offsets,
        })
    }

    /// Build a store from raw coordinate vectors, validating each point.
    pub fn from_vecs(raw: Vec<Vec<f64>>, partition_count: usize) -> Result<Self> {
        let points = raw.into_iter().map(Point::new).collect::<Result<Vec<_>>>()?;
        Self::new(points, partition_count)
    }

    /// Total number of points across all partitions.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store holds no points. Construction rejects empty
    /// datasets, so this is always false; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension shared by every point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of partitions fixed at construction.
    pub fn partition_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// The points of one partition.
    pub fn partition(&self, index: usize) -> &[Point] {
        &self.points[self.offsets[index]..self.offsets[index + 1]]
    }

    /// Global index of the first point in a partition.
    pub fn partition_offset(&self, index: usize) -> usize {
        self.offsets[index]
    }

    /// All points in global order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(n: usize, pc: usize) -> PointStore {
        let raw: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
        PointStore::from_vecs(raw, pc).unwrap()
    }

    #[test]
    fn chunks_contiguously() {
        let s = store(10, 3);
        assert_eq!(s.partition_count(), 3);
        assert_eq!(s.partition(0).len(), 4);
        assert_eq!(s.partition(1).len(), 3);
        assert_eq!(s.partition(2).len(), 3);
        assert_eq!(s.partition_offset(1), 4);
        assert_eq!(s.partition(1)[0].as_slice(), &[4.0]);
    }

    #[test]
    fn allows_empty_partitions() {
        let s = store(2, 5);
        assert_eq!(s.partition_count(), 5);
        let sizes: Vec<usize> = (0..5).map(|i| s.partition(i).len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 2);
        assert!(sizes[2..].iter().all(|&l| l == 0));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(PointStore::from_vecs(vec![], 1).is_err());
        assert!(PointStore::from_vecs(vec![vec![1.0]], 0).is_err());
        let mixed = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            PointStore::from_vecs(mixed, 1),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }
}
