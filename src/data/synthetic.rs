use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::data::store::PointStore;
use crate::error::{Error, Result};

/// Generate isotropic Gaussian blobs around the given centers.
///
/// A reproducible point source for tests, benches, and demos: each center
/// contributes `points_per_blob` samples drawn from `N(center, std)` per
/// coordinate, and the result is chunked into `partition_count` partitions.
///
/// # Arguments
///
/// * `centers` - Blob centers; all must share one dimension.
/// * `points_per_blob` - Samples drawn around each center.
/// * `std` - Standard deviation of the per-coordinate noise.
/// * `partition_count` - Partitioning of the resulting store.
/// * `rng` - Seedable RNG; the same seed reproduces the same dataset.
pub fn gaussian_blobs<R: Rng>(
    centers: &[Vec<f64>],
    points_per_blob: usize,
    std: f64,
    partition_count: usize,
    rng: &mut R,
) -> Result<PointStore> {
    if centers.is_empty() || points_per_blob == 0 {
        return Err(Error::InvalidConfig(
            "gaussian_blobs needs at least one center and one point per blob".into(),
        ));
    }
    let noise = Normal::new(0.0, std)
        .map_err(|_| Error::InvalidConfig("blob std must be finite and non-negative".into()))?;

    let mut raw = Vec::with_capacity(centers.len() * points_per_blob);
    for center in centers {
        for _ in 0..points_per_blob {
            raw.push(center.iter().map(|&c| c + noise.sample(rng)).collect());
        }
    }
    PointStore::from_vecs(raw, partition_count)
}
