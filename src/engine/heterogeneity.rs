use crate::data::PointStore;
use crate::engine::broadcast::CentroidSet;
use crate::engine::config::KMeansConfig;
use crate::engine::driver::KMeans;
use crate::error::Result;
use crate::exec::Executor;

/// Total within-cluster sum of squares for a centroid set: the objective
/// Lloyd's algorithm minimizes.
///
/// Computed as a distributed map (per-point squared distance to its
/// nearest centroid) with a sum reduction on the driver.
pub fn heterogeneity(
    store: &PointStore,
    centroids: &CentroidSet,
    executor: &impl Executor,
) -> f64 {
    executor
        .map_partitions(store, |_, pts| {
            pts.iter()
                .map(|p| centroids.nearest(p.as_slice()).1)
                .sum::<f64>()
        })
        .into_iter()
        .sum()
}

/// Run one independent clustering per requested k and report each run's
/// final heterogeneity, for elbow-method analysis.
///
/// `base` supplies every setting except k.
pub fn elbow_sweep(
    store: &PointStore,
    ks: &[usize],
    base: &KMeansConfig,
    executor: &impl Executor,
) -> Result<Vec<(usize, f64)>> {
    ks.iter()
        .map(|&k| {
            let mut config = base.clone();
            config.k = k;
            let fit = KMeans::new(config).fit(store, executor)?;
            Ok((k, fit.heterogeneity))
        })
        .collect()
}
