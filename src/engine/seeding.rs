use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::point::squared_distance;
use crate::data::PointStore;
use crate::engine::broadcast::CentroidSet;
use crate::engine::config::{KMeansConfig, Seeding};
use crate::error::{Error, Result};
use crate::exec::Executor;

/// Choose the initial centroid set for a run.
///
/// Both strategies are deterministic for a given seed and independent of
/// partition count, because every scan walks points in global order.
pub fn seed_centroids<R: Rng>(
    store: &PointStore,
    config: &KMeansConfig,
    rng: &mut R,
    executor: &impl Executor,
) -> Result<CentroidSet> {
    let distinct = distinct_locations(store);
    if distinct < config.k {
        return Err(Error::InsufficientDistinctPoints {
            requested: config.k,
            distinct,
        });
    }
    match config.seeding {
        Seeding::Uniform => Ok(uniform(store, config.k, rng)),
        Seeding::KMeansPlusPlus => Ok(kmeans_plus_plus(store, config.k, rng, executor)),
    }
}

/// Count distinct point locations by hashing coordinate bit patterns.
fn distinct_locations(store: &PointStore) -> usize {
    let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(store.len());
    for p in store.points() {
        seen.insert(location_key(p.as_slice()));
    }
    seen.len()
}

fn location_key(coords: &[f64]) -> Vec<u64> {
    // Adding +0.0 collapses -0.0 onto 0.0 before taking bit patterns, so
    // the two zeros count as one location.
    coords.iter().map(|c| (c + 0.0).to_bits()).collect()
}

/// Uniform seeding: k distinct locations drawn without replacement.
fn uniform<R: Rng>(store: &PointStore, k: usize, rng: &mut R) -> CentroidSet {
    let mut indices: Vec<usize> = (0..store.len()).collect();
    indices.shuffle(rng);

    let mut seen = HashSet::new();
    let mut vectors = Vec::with_capacity(k);
    for idx in indices {
        let coords = store.points()[idx].as_slice();
        if seen.insert(location_key(coords)) {
            vectors.push(coords.to_vec());
            if vectors.len() == k {
                break;
            }
        }
    }
    // The distinct-location check above guarantees k were found.
    CentroidSet::from_vectors(vectors)
}

/// k-means++ seeding (Arthur/Vassilvitskii), distributed.
///
/// Maintains, per point, the squared distance to the nearest centroid
/// chosen so far. Each round refreshes those distances partition-parallel
/// against only the newest centroid, reduces the per-partition sums on the
/// driver, and draws the next centroid with probability proportional to
/// its squared distance. One full pass per round: O(n·k·d) total.
fn kmeans_plus_plus<R: Rng>(
    store: &PointStore,
    k: usize,
    rng: &mut R,
    executor: &impl Executor,
) -> CentroidSet {
    let n = store.len();
    let first = rng.gen_range(0..n);
    let mut vectors = vec![store.points()[first].as_slice().to_vec()];
    let mut chosen = vec![first];

    // d2[p]: squared distance from point p to the nearest chosen centroid.
    let mut d2 = vec![0.0; n];
    let mut total = refresh_distances(store, &mut d2, &vectors[0], true, executor);

    for _ in 1..k {
        let next = if total > 0.0 && total.is_finite() {
            weighted_pick(&d2, total, rng)
        } else {
            // Every remaining point coincides with an existing centroid;
            // fall back to a uniform draw over the unchosen ones.
            uniform_unchosen(n, &chosen, rng)
        };
        vectors.push(store.points()[next].as_slice().to_vec());
        chosen.push(next);

        if vectors.len() < k {
            let latest = vectors[vectors.len() - 1].clone();
            total = refresh_distances(store, &mut d2, &latest, false, executor);
        }
    }
    CentroidSet::from_vectors(vectors)
}

/// Recompute `d2` against the newest centroid, one partition at a time,
/// and return the global sum Σd2 reduced on the driver.
fn refresh_distances(
    store: &PointStore,
    d2: &mut [f64],
    latest: &[f64],
    initial: bool,
    executor: &impl Executor,
) -> f64 {
    let prior: &[f64] = d2;
    let chunks: Vec<(Vec<f64>, f64)> = executor.map_partitions(store, |pidx, pts| {
        let offset = store.partition_offset(pidx);
        let mut chunk = Vec::with_capacity(pts.len());
        let mut sum = 0.0;
        for (i, p) in pts.iter().enumerate() {
            let mut d = squared_distance(p.as_slice(), latest);
            if !initial {
                d = d.min(prior[offset + i]);
            }
            chunk.push(d);
            sum += d;
        }
        (chunk, sum)
    });

    let mut total = 0.0;
    for (pidx, (chunk, sum)) in chunks.into_iter().enumerate() {
        let offset = store.partition_offset(pidx);
        d2[offset..offset + chunk.len()].copy_from_slice(&chunk);
        total += sum;
    }
    total
}

/// Draw an index with probability d2[i] / total.
fn weighted_pick<R: Rng>(d2: &[f64], total: f64, rng: &mut R) -> usize {
    let mut remaining = rng.gen::<f64>() * total;
    let mut last_positive = 0;
    for (idx, &w) in d2.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        last_positive = idx;
        if remaining < w {
            return idx;
        }
        remaining -= w;
    }
    // Rounding can leave a sliver of `remaining`; the last positive-weight
    // point absorbs it.
    last_positive
}

fn uniform_unchosen<R: Rng>(n: usize, chosen: &[usize], rng: &mut R) -> usize {
    let unchosen: Vec<usize> = (0..n).filter(|i| !chosen.contains(i)).collect();
    unchosen[rng.gen_range(0..unchosen.len())]
}
