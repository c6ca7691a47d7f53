use crate::data::Point;
use crate::engine::broadcast::CentroidSet;

/// Per-partition aggregate of one assignment pass: for every centroid id,
/// the elementwise sum of assigned points and their count, plus the sum of
/// squared distances from each point to its assigned centroid.
///
/// The distance sum rides along so per-iteration heterogeneity needs no
/// second pass over the data. Aggregates are transient: the reducer
/// consumes them and the driver keeps only the merged result.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialAggregate {
    sums: Vec<Vec<f64>>,
    counts: Vec<u64>,
    sq_dist_sum: f64,
}

impl PartialAggregate {
    /// An aggregate with no observations. Empty partitions contribute
    /// exactly this.
    pub fn empty(k: usize, dim: usize) -> Self {
        Self {
            sums: vec![vec![0.0; dim]; k],
            counts: vec![0; k],
            sq_dist_sum: 0.0,
        }
    }

    fn observe(&mut self, id: usize, point: &Point, sq_dist: f64) {
        for (acc, &c) in self.sums[id].iter_mut().zip(point.as_slice()) {
            *acc += c;
        }
        self.counts[id] += 1;
        self.sq_dist_sum += sq_dist;
    }

    /// Coordinate sum of the points assigned to a centroid.
    pub fn sum(&self, id: usize) -> &[f64] {
        &self.sums[id]
    }

    /// Per-centroid assignment counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of squared distances from each observed point to its assigned
    /// centroid (within-cluster sum of squares for this aggregate).
    pub fn sq_dist_sum(&self) -> f64 {
        self.sq_dist_sum
    }

    /// Merge another aggregate into this one: elementwise vector addition
    /// and count addition. Associative and commutative, so the merged
    /// result does not depend on partition count or arrival order.
    pub fn merge(mut self, other: &PartialAggregate) -> Self {
        debug_assert_eq!(self.counts.len(), other.counts.len());
        for (mine, theirs) in self.sums.iter_mut().zip(&other.sums) {
            for (acc, &c) in mine.iter_mut().zip(theirs) {
                *acc += c;
            }
        }
        for (mine, &theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        self.sq_dist_sum += other.sq_dist_sum;
        self
    }
}

/// The assignment mapper: assign every point of one partition to its
/// nearest centroid (ties to the lowest id) and fold the partition into a
/// [`PartialAggregate`].
///
/// A pure function of the partition contents and the centroid snapshot;
/// it touches no shared state.
pub fn assign_partition(points: &[Point], centroids: &CentroidSet) -> PartialAggregate {
    let mut agg = PartialAggregate::empty(centroids.k(), centroids.dim());
    for point in points {
        let (id, sq_dist) = centroids.nearest(point.as_slice());
        agg.observe(id, point, sq_dist);
    }
    agg
}

/// The aggregation reducer: combine per-partition aggregates into the
/// global per-centroid sums and counts.
pub fn reduce_partials(
    partials: impl IntoIterator<Item = PartialAggregate>,
    k: usize,
    dim: usize,
) -> PartialAggregate {
    partials
        .into_iter()
        .fold(PartialAggregate::empty(k, dim), |acc, p| acc.merge(&p))
}
