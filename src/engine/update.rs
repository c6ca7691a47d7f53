use log::warn;

use crate::data::point::squared_distance;
use crate::data::PointStore;
use crate::engine::assignment::PartialAggregate;
use crate::engine::broadcast::CentroidSet;
use crate::exec::Executor;

/// Result of one centroid update step.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// The replacement centroid set.
    pub centroids: CentroidSet,
    /// Euclidean distance each centroid moved, indexed by id.
    pub displacements: Vec<f64>,
    /// Ids of centroids that received no points and were reinitialized.
    pub recovered: Vec<usize>,
}

/// Derive the next centroid set from the reduced aggregate.
///
/// Centroids with assigned points move to the mean of those points. A
/// centroid that received none (a degenerate empty cluster) is
/// reinitialized to the point, across the full dataset, farthest from its
/// nearest surviving centroid; k never shrinks. Ties go to the lowest
/// global point index, and a point consumed by one recovery is excluded
/// from later ones in the same round, so recovery is deterministic and
/// independent of partitioning.
pub fn update_centroids(
    previous: &CentroidSet,
    aggregate: &PartialAggregate,
    store: &PointStore,
    executor: &impl Executor,
) -> UpdateOutcome {
    let k = previous.k();
    let dim = previous.dim();

    let mut vectors: Vec<Option<Vec<f64>>> = Vec::with_capacity(k);
    let mut empty_ids = Vec::new();
    for id in 0..k {
        let count = aggregate.counts()[id];
        if count == 0 {
            vectors.push(None);
            empty_ids.push(id);
        } else {
            let mean = aggregate
                .sum(id)
                .iter()
                .map(|&s| s / count as f64)
                .collect();
            vectors.push(Some(mean));
        }
    }

    let mut consumed: Vec<usize> = Vec::new();
    for id in empty_ids {
        let survivors: Vec<Vec<f64>> = vectors.iter().flatten().cloned().collect();
        match farthest_point(store, &survivors, &consumed, executor) {
            Some(point_idx) => {
                warn!(
                    "cluster {id} is empty; reinitializing its centroid to point {point_idx}"
                );
                vectors[id] = Some(store.points()[point_idx].as_slice().to_vec());
                consumed.push(point_idx);
            }
            None => {
                // Nothing left to steal; keep the old position.
                warn!("cluster {id} is empty and no reinitialization point remains");
                vectors[id] = Some(previous.vector(id).to_vec());
            }
        }
    }

    let vectors: Vec<Vec<f64>> = vectors
        .into_iter()
        .map(|v| v.unwrap_or_else(|| vec![0.0; dim]))
        .collect();

    let displacements: Vec<f64> = (0..k)
        .map(|id| squared_distance(previous.vector(id), &vectors[id]).sqrt())
        .collect();
    let recovered: Vec<usize> = (0..k)
        .filter(|&id| aggregate.counts()[id] == 0)
        .collect();

    UpdateOutcome {
        centroids: CentroidSet::from_vectors(vectors),
        displacements,
        recovered,
    }
}

/// Global index of the point farthest from its nearest survivor, computed
/// as a distributed map plus a driver-side max reduction.
fn farthest_point(
    store: &PointStore,
    survivors: &[Vec<f64>],
    consumed: &[usize],
    executor: &impl Executor,
) -> Option<usize> {
    if survivors.is_empty() {
        return None;
    }
    let candidates: Vec<Option<(f64, usize)>> = executor.map_partitions(store, |pidx, pts| {
        let offset = store.partition_offset(pidx);
        let mut best: Option<(f64, usize)> = None;
        for (i, p) in pts.iter().enumerate() {
            let global = offset + i;
            if consumed.contains(&global) {
                continue;
            }
            let d = survivors
                .iter()
                .map(|s| squared_distance(p.as_slice(), s))
                .fold(f64::INFINITY, f64::min);
            // Strict comparison keeps the lowest global index on ties,
            // since points are scanned in ascending order.
            if best.map_or(true, |(bd, _)| d > bd) {
                best = Some((d, global));
            }
        }
        best
    });

    candidates
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<(f64, usize)>, cand| match acc {
            Some((bd, _)) if cand.0 <= bd => acc,
            _ => Some(cand),
        })
        .map(|(_, idx)| idx)
}
